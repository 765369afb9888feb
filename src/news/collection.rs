//! The entry collection: dedup/merge, ranking and retention.

use std::sync::{Arc, RwLock};

use crate::news::types::Entry;

/// Ordered set of entries keyed by [`Entry::id`].
///
/// Invariant: no two entries share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    entries: Vec<Entry>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from stored entries.
    ///
    /// Entries are re-keyed from their trimmed title and link, then
    /// repeated ids are dropped.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut collection = Self::new();
        collection.merge(entries.into_iter().map(Entry::normalized));
        collection
    }

    /// Append every entry whose id is not present yet.
    ///
    /// Duplicates, including repeats within `incoming`, are dropped
    /// silently; the first copy seen wins regardless of source. Returns
    /// the number of entries added.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Entry>) -> usize {
        let before = self.entries.len();
        for entry in incoming {
            // Linear scan; the retention window keeps this small.
            if !self.contains(&entry.id) {
                self.entries.push(entry);
            }
        }
        self.entries.len() - before
    }

    /// Sort newest first and keep at most `max_entries`.
    ///
    /// The sort is stable, so entries with equal timestamps keep their
    /// merge order. Returns the number of evicted entries.
    pub fn rank_and_truncate(&mut self, max_entries: usize) -> usize {
        self.entries
            .sort_by(|a, b| b.published_at.cmp(&a.published_at));
        let evicted = self.entries.len().saturating_sub(max_entries);
        self.entries.truncate(max_entries);
        evicted
    }

    /// Whether an entry with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Entries in their current order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Published view of the collection shared with readers.
///
/// Writers replace the whole snapshot at once, so a reader sees either
/// the state before a crawl cycle or the state after it.
#[derive(Debug, Clone, Default)]
pub struct SharedCollection {
    inner: Arc<RwLock<Arc<Vec<Entry>>>>,
}

impl SharedCollection {
    /// Create an empty shared collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries. Never blocks on a running crawl cycle.
    pub fn snapshot(&self) -> Arc<Vec<Entry>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the published entries.
    pub fn publish(&self, entries: Vec<Entry>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(entries);
    }
}
