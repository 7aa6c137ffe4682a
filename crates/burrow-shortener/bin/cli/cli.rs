use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BURROW_DB_PATH";
pub const HOST_ENV: &str = "BURROW_HOST";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_DB_PATH: &str = "burrow.redb";
pub const DEFAULT_HOST: &str = "localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow", version, about = "Shorten and resolve urls")]
pub struct CLI {
    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Prefix of the short urls printed by `shorten`.
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a url.
    Shorten {
        url: String,
        /// Commit the mapping before printing the code.
        #[arg(long)]
        sync: bool,
    },
    /// Print the full url behind a short code.
    Resolve { code: String },
    /// Print the short code already issued for a url.
    Lookup { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        CLI::command().debug_assert();
    }

    #[test]
    fn parses_shorten_with_defaults() {
        let cli = CLI::try_parse_from(["burrow", "shorten", "http://tt.t", "--sync"]).unwrap();

        assert_eq!(cli.log_format, LogFormat::Pretty);
        match cli.command {
            Command::Shorten { url, sync } => {
                assert_eq!(url, "http://tt.t");
                assert!(sync);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_log_format() {
        let parsed = CLI::try_parse_from(["burrow", "--log-format", "xml", "resolve", "1"]);
        assert!(parsed.is_err());
    }
}
