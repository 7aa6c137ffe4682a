//! Core types and traits for the burrow URL shortener.
//!
//! This crate provides the value types ([`ShortCode`], [`FullUrl`]), the
//! identifier-to-code [`CodeCodec`], the durable [`Index`] contract, and the
//! [`Shortener`] contract consumed by request boundaries.

pub mod codec;
pub mod error;
pub mod full_url;
pub mod index;
pub mod shortcode;
pub mod shortener;

pub use codec::{Alphabet, CodeCodec, DEFAULT_ALPHABET};
pub use error::{CoreError, ShortenerError, StorageError};
pub use full_url::FullUrl;
pub use index::{Index, ReadIndex};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
