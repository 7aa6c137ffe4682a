use crate::error::Result;
use crate::settings::StoreSettings;
use async_trait::async_trait;
use burrow_core::{CodeCodec, FullUrl, Index, ShortCode, Shortener};
use burrow_generator::SeqGenerator;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace};

/// The shortener facade over an [`Index`].
///
/// Owns the identifier generator and the set of background writes started by
/// [`save`](Self::save). A store must be shut down with
/// [`close`](Self::close); dropping it leaves background writes detached.
///
/// Mappings whose background write has not committed yet are kept in memory,
/// so a repeated save of the same URL returns the code already handed out.
/// Concurrent saves of the same new URL may still each allocate a code: the
/// dedup lookup and the allocation are not one transaction.
#[derive(Debug)]
pub struct LinkStore<I: Index> {
    index: Arc<I>,
    generator: SeqGenerator,
    codec: CodeCodec,
    writes: TaskTracker,
    in_flight: Arc<Mutex<HashMap<FullUrl, ShortCode>>>,
}

impl<I: Index> LinkStore<I> {
    /// Opens a store over `index` with default settings.
    pub async fn init(index: I) -> Result<Self> {
        Self::with_settings(index, StoreSettings::default()).await
    }

    pub async fn with_settings(index: I, settings: StoreSettings) -> Result<Self> {
        let index = Arc::new(index);
        let generator =
            SeqGenerator::start_with_capacity(Arc::clone(&index), settings.mailbox_capacity)
                .await?;

        info!(
            alphabet = settings.alphabet.as_str(),
            mailbox_capacity = settings.mailbox_capacity,
            "link store ready"
        );

        Ok(Self {
            index,
            generator,
            codec: CodeCodec::new(settings.alphabet),
            writes: TaskTracker::new(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Returns the code for `full`, allocating one if the URL is new.
    ///
    /// The mapping for a new code is written by a background task; the code
    /// is returned before that write commits.
    pub async fn save(&self, full: FullUrl) -> Result<ShortCode> {
        if let Some(short) = self.existing(&full).await? {
            return Ok(short);
        }

        let short = self.allocate().await?;
        self.in_flight.lock().insert(full.clone(), short.clone());

        let index = Arc::clone(&self.index);
        let in_flight = Arc::clone(&self.in_flight);
        let code = short.clone();
        self.writes.spawn(async move {
            match index.dual_put(&code, &full).await {
                Ok(()) => trace!(short_code = %code, "background write committed"),
                Err(err) => error!(short_code = %code, error = %err, "background write failed"),
            }
            let mut in_flight = in_flight.lock();
            if in_flight.get(&full) == Some(&code) {
                in_flight.remove(&full);
            }
        });

        Ok(short)
    }

    /// Like [`save`](Self::save), but the mapping is committed before this
    /// returns.
    pub async fn save_sync(&self, full: FullUrl) -> Result<ShortCode> {
        if let Some(short) = self.existing(&full).await? {
            return Ok(short);
        }

        let short = self.allocate().await?;
        self.index.dual_put(&short, &full).await?;
        Ok(short)
    }

    pub async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>> {
        Ok(self.index.get_full(short).await?)
    }

    pub async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>> {
        Ok(self.index.get_short(full).await?)
    }

    /// Number of background writes that have not finished yet.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Drains background writes, stops the generator and releases the index.
    pub async fn close(mut self) -> Result<()> {
        self.writes.close();
        let pending = self.writes.len();
        if pending > 0 {
            info!(pending, "waiting for background writes");
        }
        self.writes.wait().await;

        let stopped = self.generator.stop().await;
        self.generator.wait_checkpoints().await;
        stopped?;

        info!("link store closed");
        Ok(())
    }

    async fn existing(&self, full: &FullUrl) -> Result<Option<ShortCode>> {
        let pending = self.in_flight.lock().get(full).cloned();
        let short = match pending {
            Some(short) => Some(short),
            None => self.index.get_short(full).await?,
        };
        if let Some(short) = &short {
            debug!(short_code = %short, "url already shortened");
        }
        Ok(short)
    }

    async fn allocate(&self) -> Result<ShortCode> {
        let id = self.generator.next_id().await?;
        let short = self.codec.encode(id);
        debug!(id, short_code = %short, "allocated short code");
        Ok(short)
    }
}

#[async_trait]
impl<I: Index> Shortener for LinkStore<I> {
    async fn save(&self, full: FullUrl) -> Result<ShortCode> {
        LinkStore::save(self, full).await
    }

    async fn save_sync(&self, full: FullUrl) -> Result<ShortCode> {
        LinkStore::save_sync(self, full).await
    }

    async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>> {
        LinkStore::get_full(self, short).await
    }

    async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>> {
        LinkStore::get_short(self, full).await
    }
}
