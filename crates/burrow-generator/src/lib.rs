//! Serial identifier generation for burrow.
//!
//! [`SeqGenerator`] hands out strictly increasing `u64` identifiers from a
//! single actor task and checkpoints each one to the index in the background.

pub mod error;
pub mod seq;

pub use error::{GeneratorError, Result};
pub use seq::{SeqGenerator, DEFAULT_MAILBOX_CAPACITY};
