//! The staleness-tracked recency cache.
//!
//! [`RecencyCache`] holds the current ranked entry list plus a freshness
//! flag, and nothing else: no external resources, no querying, no policy.
//! It is mutated only by the controller; invalidation deliberately leaves the
//! entries in place so last-known-good data survives an unavailable index.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::{Entry, FreshnessState};

/// In-memory ranked top-N list of most-recently-modified documents plus a
/// freshness flag.
///
/// Created empty and stale; nothing is persisted across restarts.
#[derive(Debug)]
pub struct RecencyCache {
    entries: Mutex<Vec<Entry>>,
    fresh: AtomicBool,
    limit: usize,
}

impl RecencyCache {
    /// Create an empty, stale cache bounded to `limit` entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fresh: AtomicBool::new(false),
            limit,
        }
    }

    /// Non-blocking snapshot of the current entries and freshness flag.
    #[must_use]
    pub fn read(&self) -> (Vec<Entry>, bool) {
        let entries = lock_entries(&self.entries).clone();
        (entries, self.fresh.load(Ordering::SeqCst))
    }

    /// Atomically swap in a new entry list and mark the cache fresh.
    ///
    /// Callers rank and truncate before replacing; the bound is enforced
    /// here regardless.
    pub fn replace(&self, mut entries: Vec<Entry>) {
        debug_assert!(entries.len() <= self.limit);
        entries.truncate(self.limit);
        *lock_entries(&self.entries) = entries;
        self.fresh.store(true, Ordering::SeqCst);
    }

    /// Mark the cache stale. Idempotent; entries are left untouched.
    pub fn invalidate(&self) {
        self.fresh.store(false, Ordering::SeqCst);
    }

    /// Whether the entries reflect the last successful query with no
    /// invalidation observed since.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::SeqCst)
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_entries(&self.entries).is_empty()
    }

    /// Maximum number of entries this cache will hold.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Derived freshness state.
    #[must_use]
    pub fn state(&self) -> FreshnessState {
        if self.is_fresh() {
            FreshnessState::Fresh
        } else if self.is_empty() {
            FreshnessState::StaleEmpty
        } else {
            FreshnessState::StaleWithData
        }
    }

    /// Remove the entry with exactly this path, preserving the relative
    /// order of the remainder. The freshness flag is not touched: one
    /// missing document does not mean the rest of the list is stale.
    ///
    /// Returns `true` if an entry was removed.
    pub(crate) fn remove_path(&self, path: &str) -> bool {
        let mut entries = lock_entries(&self.entries);
        let before = entries.len();
        entries.retain(|entry| entry.path != path);
        entries.len() != before
    }
}

/// Lock helper that shrugs off poisoning; the cache holds plain data and a
/// panicking reader cannot leave it in a half-written state.
fn lock_entries(entries: &Mutex<Vec<Entry>>) -> std::sync::MutexGuard<'_, Vec<Entry>> {
    entries
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
