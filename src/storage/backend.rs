//! Storage backend abstraction.
//!
//! The [`Storage`] trait covers exactly what the worker needs: reading,
//! writing and forgetting the persisted search position.

use crate::domain::error::Result;
use crate::storage::models::SnapshotRecord;

/// Abstraction over persistent storage backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use zgallery::storage::{JsonStorage, SnapshotRecord, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/session.json"))?;
/// storage.save_snapshot(&SnapshotRecord::new("puppy", 2))?;
/// assert_eq!(storage.load_snapshot()?.map(|s| s.last_page), Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the stored snapshot, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_snapshot(&self) -> Result<Option<SnapshotRecord>>;

    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_snapshot(&mut self, snapshot: &SnapshotRecord) -> Result<()>;

    /// Removes the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear_snapshot(&mut self) -> Result<()>;
}
