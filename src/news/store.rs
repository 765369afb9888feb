//! Snapshot persistence.
//!
//! The whole collection lives in one pretty-printed JSON array. Saves
//! write a sibling temp file and rename it over the target so `load`
//! never observes a half-written snapshot.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{NewsError, Result};
use crate::news::types::Entry;

/// JSON snapshot file for the entry collection.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the stored entries.
    ///
    /// A missing file yields an empty list. An unreadable or malformed
    /// file is a [`NewsError::Store`].
    pub async fn load(&self) -> Result<Vec<Entry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(NewsError::Store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            NewsError::Store(format!("malformed snapshot {}: {}", self.path.display(), e))
        })
    }

    /// Replace the snapshot with `entries`.
    pub async fn save(&self, entries: &[Entry]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| NewsError::Store(format!("failed to serialize snapshot: {}", e)))?;

        self.write_atomic(&bytes).await.map_err(|e| {
            NewsError::Store(format!("failed to write {}: {}", self.path.display(), e))
        })
    }

    async fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        let result = Self::write_and_rename(&tmp, &self.path, bytes).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }

    async fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(tmp, target).await
    }
}
