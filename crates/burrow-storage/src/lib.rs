//! Index backends for burrow.
//!
//! [`RedbIndex`] is the durable backend; [`InMemoryIndex`] implements the same
//! contract without persistence.

pub mod error;
pub mod memory;
pub mod redb_index;

pub use burrow_core::index::{Index, ReadIndex};
pub use error::{Result, StorageError};
pub use memory::InMemoryIndex;
pub use redb_index::RedbIndex;
