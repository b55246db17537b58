//! Persisted search position.

use serde::{Deserialize, Serialize};

/// The two scalars that survive a plugin reload: the committed search term
/// and the last page accepted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub term: String,
    pub last_page: u32,
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(term: impl Into<String>, last_page: u32) -> Self {
        Self {
            term: term.into(),
            last_page: last_page.max(1),
        }
    }

    /// A snapshot with no term carries nothing worth restoring.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            term: String::new(),
            last_page: 1,
        }
    }
}
