use crate::error::{
    decode_checkpoint, init_error, read_error, write_error, Result, StorageError,
};
use async_trait::async_trait;
use burrow_core::index::{Index, ReadIndex};
use burrow_core::{FullUrl, ShortCode};
use redb::{Database, TableDefinition};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Short code bytes to full URL bytes.
const SHORT_TO_FULL: TableDefinition<&[u8], &[u8]> = TableDefinition::new("shortToFull");

/// Full URL bytes to short code bytes.
const FULL_TO_SHORT: TableDefinition<&[u8], &[u8]> = TableDefinition::new("fullToShort");

/// Generator state. Holds the single `LastID` record.
const PROPERTIES: TableDefinition<&str, &[u8]> = TableDefinition::new("properties");

const LAST_ID_KEY: &str = "LastID";

/// Durable index backed by a redb database file.
///
/// Every operation runs in its own redb transaction on the blocking thread
/// pool. A dual put writes both directions inside one write transaction, so a
/// reader sees either the whole mapping or none of it.
///
/// The database file is closed when the last clone of the index is dropped.
#[derive(Clone)]
pub struct RedbIndex {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbIndex {
    /// Opens or creates the database at `path` and makes sure all three
    /// tables exist.
    ///
    /// Any failure here is fatal for the caller: the index cannot serve
    /// without its tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path).map_err(init_error)?;

        let txn = db.begin_write().map_err(init_error)?;
        {
            txn.open_table(SHORT_TO_FULL).map_err(init_error)?;
            txn.open_table(FULL_TO_SHORT).map_err(init_error)?;
            txn.open_table(PROPERTIES).map_err(init_error)?;
        }
        txn.commit().map_err(init_error)?;

        info!(path = %path.display(), "opened redb index");

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    /// Returns the path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<T, F>(&self, on_panic: fn(String) -> StorageError, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(db.as_ref()))
            .await
            .map_err(|e| on_panic(format!("index task failed: {e}")))?
    }
}

impl fmt::Debug for RedbIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbIndex")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReadIndex for RedbIndex {
    async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>> {
        trace!(code = %short, "looking up full url");
        let key = short.as_bytes().to_vec();

        self.run_blocking(StorageError::Read, move |db| {
            let txn = db.begin_read().map_err(read_error)?;
            let table = txn.open_table(SHORT_TO_FULL).map_err(read_error)?;
            let value = table.get(key.as_slice()).map_err(read_error)?;
            Ok(value.map(|guard| FullUrl::new(guard.value())))
        })
        .await
    }

    async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>> {
        trace!(url = %full, "looking up short code");
        let key = full.as_bytes().to_vec();

        self.run_blocking(StorageError::Read, move |db| {
            let txn = db.begin_read().map_err(read_error)?;
            let table = txn.open_table(FULL_TO_SHORT).map_err(read_error)?;
            let Some(guard) = table.get(key.as_slice()).map_err(read_error)? else {
                return Ok(None);
            };
            let code = String::from_utf8(guard.value().to_vec()).map_err(|e| {
                StorageError::InvalidData(format!("stored short code is not utf-8: {e}"))
            })?;
            Ok(Some(ShortCode::new_unchecked(code)))
        })
        .await
    }

    async fn read_checkpoint(&self) -> Result<u64> {
        self.run_blocking(StorageError::Read, |db| {
            let txn = db.begin_read().map_err(read_error)?;
            let table = txn.open_table(PROPERTIES).map_err(read_error)?;
            match table.get(LAST_ID_KEY).map_err(read_error)? {
                Some(guard) => decode_checkpoint(guard.value()),
                None => Ok(0),
            }
        })
        .await
    }
}

#[async_trait]
impl Index for RedbIndex {
    async fn dual_put(&self, short: &ShortCode, full: &FullUrl) -> Result<()> {
        debug!(code = %short, url = %full, "writing mapping");
        let short = short.as_bytes().to_vec();
        let full = full.as_bytes().to_vec();

        self.run_blocking(StorageError::Write, move |db| {
            let txn = db.begin_write().map_err(write_error)?;
            {
                let mut forward = txn.open_table(SHORT_TO_FULL).map_err(write_error)?;
                forward
                    .insert(short.as_slice(), full.as_slice())
                    .map_err(write_error)?;

                let mut reverse = txn.open_table(FULL_TO_SHORT).map_err(write_error)?;
                reverse
                    .insert(full.as_slice(), short.as_slice())
                    .map_err(write_error)?;
            }
            txn.commit().map_err(write_error)
        })
        .await
    }

    async fn write_checkpoint(&self, value: u64) -> Result<()> {
        trace!(checkpoint = value, "writing checkpoint");
        let bytes = value.to_le_bytes();

        self.run_blocking(StorageError::Write, move |db| {
            let txn = db.begin_write().map_err(write_error)?;
            {
                let mut table = txn.open_table(PROPERTIES).map_err(write_error)?;
                table
                    .insert(LAST_ID_KEY, bytes.as_slice())
                    .map_err(write_error)?;
            }
            txn.commit().map_err(write_error)
        })
        .await
    }
}
