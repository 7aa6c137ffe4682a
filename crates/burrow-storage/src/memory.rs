use crate::error::Result;
use async_trait::async_trait;
use burrow_core::index::{Index, ReadIndex};
use burrow_core::{FullUrl, ShortCode};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct State {
    short_to_full: HashMap<ShortCode, FullUrl>,
    full_to_short: HashMap<FullUrl, ShortCode>,
    last_id: Option<u64>,
}

/// In-memory implementation of the index contract.
///
/// Both tables and the checkpoint live behind one lock, so a dual put is
/// observed atomically. Nothing survives a drop; use [`RedbIndex`] for that.
///
/// [`RedbIndex`]: crate::RedbIndex
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    state: RwLock<State>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index that starts from an existing checkpoint.
    pub fn with_checkpoint(last_id: u64) -> Self {
        let index = Self::new();
        index.state.write().last_id = Some(last_id);
        index
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.state.read().short_to_full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadIndex for InMemoryIndex {
    async fn get_full(&self, short: &ShortCode) -> Result<Option<FullUrl>> {
        Ok(self.state.read().short_to_full.get(short).cloned())
    }

    async fn get_short(&self, full: &FullUrl) -> Result<Option<ShortCode>> {
        Ok(self.state.read().full_to_short.get(full).cloned())
    }

    async fn read_checkpoint(&self) -> Result<u64> {
        Ok(self.state.read().last_id.unwrap_or(0))
    }
}

#[async_trait]
impl Index for InMemoryIndex {
    async fn dual_put(&self, short: &ShortCode, full: &FullUrl) -> Result<()> {
        let mut state = self.state.write();
        state.short_to_full.insert(short.clone(), full.clone());
        state.full_to_short.insert(full.clone(), short.clone());
        Ok(())
    }

    async fn write_checkpoint(&self, value: u64) -> Result<()> {
        self.state.write().last_id = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get_both_directions() {
        let index = InMemoryIndex::new();

        index
            .dual_put(&code("1"), &FullUrl::from("http://tt.t"))
            .await
            .unwrap();

        assert_eq!(
            index.get_full(&code("1")).await.unwrap(),
            Some(FullUrl::from("http://tt.t"))
        );
        assert_eq!(
            index.get_short(&FullUrl::from("http://tt.t")).await.unwrap(),
            Some(code("1"))
        );
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let index = InMemoryIndex::new();

        assert!(index.get_full(&code("nope")).await.unwrap().is_none());
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn checkpoint_round_trip() {
        let index = InMemoryIndex::new();
        assert_eq!(index.read_checkpoint().await.unwrap(), 0);

        index.write_checkpoint(42).await.unwrap();
        assert_eq!(index.read_checkpoint().await.unwrap(), 42);

        let seeded = InMemoryIndex::with_checkpoint(9);
        assert_eq!(seeded.read_checkpoint().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn concurrent_access() {
        let index = Arc::new(InMemoryIndex::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let index = Arc::clone(&index);
            handles.push(tokio::spawn(async move {
                let short = code(&format!("code-{:03}", i));
                let full = FullUrl::from(format!("https://example{}.com", i));
                index.dual_put(&short, &full).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let short = code(&format!("code-{:03}", i));
            let full = index.get_full(&short).await.unwrap().unwrap();
            assert_eq!(full, FullUrl::from(format!("https://example{}.com", i)));
            assert_eq!(index.get_short(&full).await.unwrap(), Some(short));
        }
    }
}
