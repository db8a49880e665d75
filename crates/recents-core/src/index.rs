//! Capability interface over the external document index.
//!
//! The host surface that actually answers queries is uncertain territory:
//! another process, a plugin API, a service that may not be installed at all.
//! Core logic never touches it directly; everything goes through the narrow
//! [`IndexProvider`] trait, implemented by a shim on the host side.
//!
//! The provider is pure from this crate's perspective: queries read, never
//! mutate, and may be slow. Change notifications arrive through
//! [`IndexProvider::subscribe`] and are released by dropping the returned
//! [`Subscription`] handle.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;

use crate::config::ListConfig;
use crate::types::{DocumentMeta, Entry};
use crate::Result;

/// Kinds of change notification the index emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexEventKind {
    /// The underlying index was fully rebuilt.
    ReindexComplete,
    /// A single document changed, was deleted, or was renamed.
    ///
    /// The index does not distinguish these cases; subscribers must not
    /// assume the document still exists.
    ItemChanged,
}

/// Callback invoked when a subscribed event fires.
pub type ChangeHandler = Box<dyn Fn(IndexEventKind) + Send + Sync>;

/// Handle for a single event subscription.
///
/// Dropping the handle releases the subscription. Holding subscriptions in a
/// struct field and dropping that struct at teardown gives release-on-all-
/// exit-paths without bookkeeping.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a release action to run when the handle is dropped.
    #[must_use]
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release, for providers without real
    /// subscription state.
    #[must_use]
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Sort key for recency queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Order by the document's last modification time.
    #[default]
    ModifiedTime,
}

/// Sort direction for recency queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// Parameters for one query against the external index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyQuery {
    /// Candidates carrying this tag are excluded before ranking.
    pub exclude_tag: String,
    /// Sort key; there is currently exactly one.
    pub sort: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// Maximum number of entries wanted.
    pub limit: usize,
}

impl RecencyQuery {
    /// Build the standard query for a list configuration.
    #[must_use]
    pub fn for_config(config: &ListConfig) -> Self {
        Self {
            exclude_tag: config.exclude_tag.clone(),
            sort: SortKey::default(),
            direction: SortDirection::default(),
            limit: config.max_entries,
        }
    }
}

/// Narrow capability interface implemented by the host-side index shim.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// Whether the external index is present and enabled right now.
    fn is_available(&self) -> bool;

    /// Query candidate documents.
    ///
    /// May suspend; this is the one expensive operation in the system.
    /// Providers should pre-filter on `exclude_tag` and pre-sort where the
    /// underlying index supports it, but [`rank`] re-establishes both
    /// invariants regardless.
    ///
    /// # Errors
    ///
    /// [`Error::IndexUnavailable`](crate::Error::IndexUnavailable) if the
    /// index is absent or disabled,
    /// [`Error::QueryFailed`](crate::Error::QueryFailed) if the index is
    /// present but the query errors.
    async fn query(&self, request: &RecencyQuery) -> Result<Vec<DocumentMeta>>;

    /// Subscribe to a change notification kind.
    fn subscribe(&self, kind: IndexEventKind, handler: ChangeHandler) -> Subscription;
}

/// Normalize raw index candidates into list entries.
///
/// Drops candidates carrying the exclude tag, sorts by modification time
/// (stable, so candidates with equal timestamps keep the order the index
/// returned them in), removes duplicate paths keeping the highest-ranked
/// occurrence, and truncates to the query limit.
#[must_use]
pub fn rank(candidates: Vec<DocumentMeta>, query: &RecencyQuery) -> Vec<Entry> {
    let mut kept: Vec<DocumentMeta> = candidates
        .into_iter()
        .filter(|meta| !has_tag(meta, &query.exclude_tag))
        .collect();

    match query.direction {
        SortDirection::Descending => kept.sort_by(|a, b| b.modified_at.cmp(&a.modified_at)),
        SortDirection::Ascending => kept.sort_by(|a, b| a.modified_at.cmp(&b.modified_at)),
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(kept.len().min(query.limit));
    for meta in kept {
        if entries.len() == query.limit {
            break;
        }
        if seen.insert(meta.path.clone()) {
            entries.push(Entry {
                path: meta.path,
                name: meta.name,
            });
        }
    }
    entries
}

/// Tag comparison tolerant of a leading `#`, on either side.
fn has_tag(meta: &DocumentMeta, tag: &str) -> bool {
    let wanted = tag.trim_start_matches('#');
    meta.tags
        .iter()
        .any(|t| t.trim_start_matches('#') == wanted)
}
