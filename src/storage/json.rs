//! JSON file-based storage backend.
//!
//! Writes go to a temporary file that is then renamed over the target, so the
//! file on disk is always either the old or the new snapshot.

use crate::domain::error::{GalleryError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::SnapshotRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    snapshot: Option<SnapshotRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            snapshot: None,
        }
    }
}

/// JSON file storage backend.
///
/// Used from the single worker thread only. The data is held in memory and
/// written through on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "snapshot": {
///     "term": "puppy",
///     "last_page": 2,
///     "saved_at": 1700000000
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// existing file cannot be read or parsed.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(has_snapshot = data.snapshot.is_some(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| GalleryError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            return Err(GalleryError::Storage(format!(
                "unsupported storage version {}",
                data.version
            )));
        }

        tracing::debug!(version = data.version, "loaded storage data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| GalleryError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load_snapshot(&self) -> Result<Option<SnapshotRecord>> {
        let _span = tracing::debug_span!("json_load_snapshot").entered();
        Ok(self.data.snapshot.clone())
    }

    fn save_snapshot(&mut self, snapshot: &SnapshotRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_save_snapshot",
            term = %snapshot.term,
            last_page = snapshot.last_page
        )
        .entered();

        if self.data.snapshot.as_ref().is_some_and(|current| {
            current.term == snapshot.term && current.last_page == snapshot.last_page
        }) {
            tracing::trace!("snapshot unchanged");
            return Ok(());
        }

        self.data.snapshot = Some(snapshot.clone());
        self.dirty = true;
        self.save_to_file()
    }

    fn clear_snapshot(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_snapshot").entered();

        if self.data.snapshot.take().is_none() {
            return Ok(());
        }
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
