//! Read-time refresh policy.
//!
//! Decides, from cache state and settings alone, whether a read should
//! trigger a re-query. Showing some data, even stale, beats blocking or
//! showing nothing, unless there is genuinely nothing cached, in which case
//! a query is always worth it. A user who disabled auto-refresh has opted
//! out of background re-querying; manual refresh bypasses this table
//! entirely.

/// What a read should do about staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Cache is fresh; perform no query.
    Skip,
    /// Query the index and replace the entries.
    Query,
    /// Serve the stale entries as-is; no query.
    ServeStale,
}

/// The decision table applied by `ensure_fresh()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshPolicy;

impl RefreshPolicy {
    /// Decide what a read should do.
    #[must_use]
    pub const fn decide(
        self,
        fresh: bool,
        entries_empty: bool,
        auto_refresh_enabled: bool,
    ) -> RefreshDecision {
        if fresh {
            RefreshDecision::Skip
        } else if entries_empty || auto_refresh_enabled {
            RefreshDecision::Query
        } else {
            RefreshDecision::ServeStale
        }
    }
}
