//! Ordered store of the results fetched for the current search term.

use crate::domain::ResultItem;

/// Items fetched so far for one search, in arrival order.
///
/// Insertion order is display order. `replace` swaps the whole sequence for a
/// new search; `append` only ever grows it.
#[derive(Debug, Default, Clone)]
pub struct ResultCache {
    items: Vec<ResultItem>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current contents and stores `items`. Returns the new count.
    pub fn replace(&mut self, items: Vec<ResultItem>) -> usize {
        self.items = items;
        self.items.len()
    }

    /// Appends `items` after the existing contents. Returns how many were added.
    pub fn append(&mut self, items: Vec<ResultItem>) -> usize {
        let added = items.len();
        self.items.extend(items);
        added
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultItem> {
        self.items.iter()
    }
}
