mod cli;

use crate::cli::{Command, LogFormat, CLI};
use anyhow::Context;
use burrow_core::FullUrl;
use burrow_shortener::endpoint::NOT_FOUND;
use burrow_shortener::{Endpoint, LinkStore, Reply, WriteMode};
use burrow_storage::RedbIndex;
use clap::Parser;
use http::{Method, StatusCode};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        db_path = %config.db_path.display(),
        host = %config.host,
        log_format = %config.log_format,
        "starting burrow"
    );

    let index = RedbIndex::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let store = LinkStore::init(index)
        .await
        .context("failed to start link store")?;

    let outcome = run(&store, &config).await;
    store.close().await.context("failed to close link store")?;
    let reply = outcome?;

    println!("{}", reply.body);
    if reply.status.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run(store: &LinkStore<RedbIndex>, config: &CLI) -> anyhow::Result<Reply> {
    let reply = match &config.command {
        Command::Shorten { url, sync } => {
            let mode = if *sync {
                WriteMode::Synchronous
            } else {
                WriteMode::Background
            };
            Endpoint::new(store, config.host.as_str())
                .with_mode(mode)
                .handle(&Method::POST, "/", url.as_bytes())
                .await
        }
        Command::Resolve { code } => {
            Endpoint::new(store, config.host.as_str())
                .handle(&Method::GET, &format!("/{code}"), &[])
                .await
        }
        Command::Lookup { url } => match store.get_short(&FullUrl::from(url.as_str())).await? {
            Some(short) => Reply::new(StatusCode::OK, short.as_str()),
            None => Reply::new(StatusCode::NOT_FOUND, NOT_FOUND),
        },
    };
    Ok(reply)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
