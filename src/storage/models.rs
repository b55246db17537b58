//! Storage record models.
//!
//! Records carry storage-only fields such as `saved_at` and convert to and
//! from the domain [`SessionSnapshot`].

use crate::domain::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// The persisted search position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Committed, lower-cased search term.
    pub term: String,

    /// Last page accepted for `term`.
    pub last_page: u32,

    /// Unix timestamp of the write.
    pub saved_at: i64,
}

impl SnapshotRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use zgallery::storage::SnapshotRecord;
    ///
    /// let record = SnapshotRecord::new("puppy", 0);
    /// assert_eq!(record.last_page, 1);
    /// assert!(record.saved_at > 0);
    /// ```
    pub fn new(term: impl Into<String>, last_page: u32) -> Self {
        Self {
            term: term.into(),
            last_page: last_page.max(1),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

impl From<&SessionSnapshot> for SnapshotRecord {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self::new(snapshot.term.clone(), snapshot.last_page)
    }
}

impl From<SnapshotRecord> for SessionSnapshot {
    fn from(record: SnapshotRecord) -> Self {
        SessionSnapshot::new(record.term, record.last_page)
    }
}
