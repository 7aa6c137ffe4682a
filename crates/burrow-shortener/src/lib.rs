//! The burrow link store and its request boundary.
//!
//! [`LinkStore`] ties a durable index, the serial identifier generator and
//! the code codec together. [`Endpoint`] maps method/path/body requests onto
//! any [`Shortener`](burrow_core::Shortener).

pub mod endpoint;
pub mod error;
pub mod settings;
pub mod store;

pub use endpoint::{Endpoint, Reply, WriteMode};
pub use error::{Result, ShortenerError};
pub use settings::StoreSettings;
pub use store::LinkStore;
