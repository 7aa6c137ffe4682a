use thiserror::Error;

/// Errors related to the core value types of the URL shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Failures of the durable index backend.
///
/// Absence of a key is never an error; lookups return `Ok(None)` instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage initialization failed: {0}")]
    Init(String),
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("identifier generator is stopped")]
    GeneratorStopped,
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
            CoreError::InvalidAlphabet(message) => Self::InvalidInput(message),
        }
    }
}
