use burrow_core::Alphabet;
use burrow_generator::DEFAULT_MAILBOX_CAPACITY;
use typed_builder::TypedBuilder;

/// Configures a [`LinkStore`](crate::LinkStore).
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    /// Symbols used to encode identifiers into short codes.
    ///
    /// Changing this on an existing database makes new codes disagree with
    /// the stored ones.
    #[builder(default)]
    pub alphabet: Alphabet,
    /// Pending requests buffered by the identifier generator's mailbox.
    #[builder(default = DEFAULT_MAILBOX_CAPACITY)]
    pub mailbox_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
