use std::fmt::Display;

pub use burrow_core::StorageError;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, StorageError>;

pub(crate) fn init_error(err: impl Display) -> StorageError {
    StorageError::Init(err.to_string())
}

pub(crate) fn read_error(err: impl Display) -> StorageError {
    StorageError::Read(err.to_string())
}

pub(crate) fn write_error(err: impl Display) -> StorageError {
    StorageError::Write(err.to_string())
}

/// Decodes the 8-byte little-endian checkpoint record.
pub(crate) fn decode_checkpoint(bytes: &[u8]) -> Result<u64> {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_le_bytes)
        .map_err(|_| {
            StorageError::InvalidData(format!(
                "checkpoint must be 8 bytes, got {}",
                bytes.len()
            ))
        })
}
