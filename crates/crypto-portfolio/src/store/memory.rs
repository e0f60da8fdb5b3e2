//! In-memory document store (for development/testing)

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::model::Locator;

/// In-process document map with switchable failures
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<Locator, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail as if the store were unreachable
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail as if the store were unreachable
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of all stored documents
    pub async fn snapshot(&self) -> HashMap<Locator, String> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_document(&self, locator: Locator) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("read of {locator} failed")));
        }
        Ok(self.documents.read().await.get(&locator).cloned())
    }

    async fn write_document(&self, locator: Locator, contents: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write of {locator} failed")));
        }
        self.documents
            .write()
            .await
            .insert(locator, contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_write() {
        let store = MemoryDocumentStore::new();
        let cell = Locator(3, 2);

        assert_eq!(store.read_document(cell).await.unwrap(), None);
        store.write_document(cell, "{}").await.unwrap();
        assert_eq!(store.read_document(cell).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryDocumentStore::new();
        store.fail_writes(true);
        assert!(store.write_document(Locator::REGISTRY, "{}").await.is_err());

        store.fail_writes(false);
        store.fail_reads(true);
        store.write_document(Locator::REGISTRY, "{}").await.unwrap();
        assert!(matches!(
            store.read_document(Locator::REGISTRY).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
