//! Core data types for the recency list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single row in the recency list.
///
/// Identity is `path`; `name` is presentational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier of the document within the host.
    pub path: String,
    /// Display string shown in the list.
    pub name: String,
}

impl Entry {
    /// Create an entry from its path and display name.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// A candidate document as returned by the external index, before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Unique identifier of the document.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Last modification time according to the index.
    pub modified_at: DateTime<Utc>,
    /// Tags the index associates with the document.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Freshness dimension of the cache, derived from its contents and flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    /// Entries reflect the last successful query; no invalidation since.
    Fresh,
    /// An invalidation arrived, but last-known-good entries are held.
    StaleWithData,
    /// Stale and nothing cached (including the never-queried startup state).
    StaleEmpty,
}

/// Status reported alongside a snapshot of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    /// The entries reflect the latest known index state.
    Fresh,
    /// The entries are served as-is while the index has newer data.
    Stale,
    /// The external index is absent or disabled; entries are last-known-good.
    Unavailable,
}

/// Snapshot handed to callers of `read()` / `ensure_fresh()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Current entries, most recent first.
    pub entries: Vec<Entry>,
    /// Freshness status of those entries.
    pub status: ListStatus,
}

/// Everything the presentation layer needs to draw the list once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFrame {
    /// Entries to render, most recent first.
    pub entries: Vec<Entry>,
    /// Path of the document currently active in the host, if any.
    pub active_path: Option<String>,
    /// Status for the frame; `Unavailable` should render as a message.
    pub status: ListStatus,
}
