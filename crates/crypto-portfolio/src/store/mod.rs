//! Document Storage
//!
//! Profiles and portfolios are persisted as JSON documents addressed by a
//! `Locator`. The backing store only knows how to read and write strings.

mod file;
mod memory;
mod portfolio_store;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use portfolio_store::PortfolioStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::Locator;

/// Raw document storage (Strategy pattern)
///
/// Errors distinguish permission problems from other failures so they can be
/// logged precisely; callers do not branch on the difference.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Document at `locator`, or `None` if the slot was never written
    async fn read_document(&self, locator: Locator) -> StoreResult<Option<String>>;

    /// Overwrite the document at `locator`
    async fn write_document(&self, locator: Locator, contents: &str) -> StoreResult<()>;
}
