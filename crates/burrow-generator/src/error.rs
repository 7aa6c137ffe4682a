use burrow_core::{ShortenerError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors returned by the identifier generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The counter actor is no longer running.
    #[error("identifier generator is stopped")]
    Stopped,
    #[error("counter actor failed: {0}")]
    Actor(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<GeneratorError> for ShortenerError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::Stopped | GeneratorError::Actor(_) => Self::GeneratorStopped,
            GeneratorError::Storage(err) => Self::Storage(err),
        }
    }
}
