pub use burrow_core::ShortenerError;

pub type Result<T> = std::result::Result<T, ShortenerError>;
