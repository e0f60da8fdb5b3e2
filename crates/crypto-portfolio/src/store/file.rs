//! File-backed document store
//!
//! All documents live in one JSON object keyed by cell address (`R3C2`).
//! Writes go to a temp file that is then renamed over the store file, so a
//! crash mid-write never leaves a truncated store behind.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::model::Locator;

type Cells = BTreeMap<String, String>;

/// JSON file holding every document
#[derive(Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
    // Serializes read-modify-write of the file within this process
    lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Cells> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Cells::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Cells::new()),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    async fn save(&self, cells: &Cells) -> StoreResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(cells)?;

        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, e))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::PermissionDenied {
        StoreError::PermissionDenied(path.display().to_string())
    } else {
        StoreError::Io(err)
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn read_document(&self, locator: Locator) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(&locator.to_string()))
    }

    async fn write_document(&self, locator: Locator, contents: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut cells = self.load().await?;
        cells.insert(locator.to_string(), contents.to_string());
        self.save(&cells).await
    }
}
