use crate::full_url::FullUrl;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// The save/lookup contract consumed by request boundaries.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the code for `full`, allocating one if the URL is new.
    ///
    /// A new mapping is written in the background; the code may be returned
    /// before the write is durable.
    async fn save(&self, full: FullUrl) -> Result<ShortCode>;

    /// Same as [`save`][Self::save], but returns only after the mapping is
    /// committed.
    async fn save_sync(&self, full: FullUrl) -> Result<ShortCode>;

    /// Resolves a short code to its full URL. `None` if the code is unknown.
    async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>>;

    /// Looks up the code already issued for `full`. `None` if it was never saved.
    async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>>;
}
