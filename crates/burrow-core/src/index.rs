use crate::error::StorageError;
use crate::full_url::FullUrl;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the durable index.
///
/// The index holds exactly two tables (short to full, full to short) and one
/// checkpoint of the last issued identifier.
#[async_trait]
pub trait ReadIndex: Send + Sync + 'static {
    /// Returns the full URL stored for `short`, or `None` if the code is unknown.
    async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>>;

    /// Returns the short code stored for `full`, or `None` if it was never saved.
    async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>>;

    /// Returns the last checkpointed identifier, `0` if none was ever written.
    async fn read_checkpoint(&self) -> Result<u64>;
}

#[async_trait]
pub trait Index: ReadIndex {
    /// Writes both directions of a mapping in a single transaction.
    ///
    /// Either both entries become visible or neither does. Existing entries
    /// under the same keys are overwritten.
    async fn dual_put(&self, short: &ShortCode, full: &FullUrl) -> Result<()>;

    /// Overwrites the checkpoint. Concurrent calls are last-commit-wins.
    async fn write_checkpoint(&self, value: u64) -> Result<()>;
}
