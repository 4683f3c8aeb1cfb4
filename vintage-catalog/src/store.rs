//! Durable catalog storage and in-memory snapshot.
//!
//! The store owns the current snapshot behind an `RwLock<Arc<_>>`:
//! replacement is a single Arc swap, so readers always see a whole
//! snapshot, old or new, never a partial mix.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::errors::CatalogResult;
use crate::models::ProductRecord;

/// The authoritative record list plus its flattened text projection.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub records: Vec<ProductRecord>,
    /// One entry per record (name, price, category, then the link),
    /// used as raw model context when retrieval is bypassed.
    pub context: String,
}

impl CatalogSnapshot {
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        let context = flatten(&records);
        Self { records, context }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn flatten(records: &[ProductRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "- {} | Giá: {} | Loại: {}\n  Link: {}\n",
            record.name, record.price, record.category, record.url
        ));
    }
    out
}

/// Single source of truth for the current catalog.
pub struct CatalogStore {
    path: PathBuf,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// Current snapshot. Cheap clone of the inner Arc.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    /// Write records to the durable file.
    ///
    /// An empty list is a no-op: a failed crawl must never erase
    /// existing data.
    pub fn persist(&self, records: &[ProductRecord]) -> CatalogResult<()> {
        if records.is_empty() {
            debug!("skipping persist of empty record list");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        info!(count = records.len(), path = %self.path.display(), "catalog persisted");
        Ok(())
    }

    /// Refresh the in-memory snapshot from the durable file.
    ///
    /// A missing or unreadable file leaves the previous snapshot in
    /// place. Returns the record count of the snapshot now in effect.
    pub async fn load(&self) -> usize {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no catalog file yet");
            return self.snapshot.read().await.len();
        }

        match self.read_file() {
            Ok(records) => {
                let snapshot = Arc::new(CatalogSnapshot::from_records(records));
                let count = snapshot.len();
                *self.snapshot.write().await = snapshot;
                info!(count, "catalog snapshot loaded");
                count
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(),
                      "failed to read catalog file - keeping previous snapshot");
                self.snapshot.read().await.len()
            }
        }
    }

    /// Persist a crawl run's records and refresh the in-memory views,
    /// giving read-after-write consistency.
    pub async fn reload(&self, records: Vec<ProductRecord>) -> CatalogResult<usize> {
        self.persist(&records)?;
        Ok(self.load().await)
    }

    fn read_file(&self) -> CatalogResult<Vec<ProductRecord>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
