//! # recents-core
//!
//! A ranked, size-bounded list of recently modified documents for display
//! inside a host application, sourced from an external indexing service.
//!
//! The hard problem is keeping the list cheap to read while staying
//! eventually correct under asynchronous change notifications: no re-query
//! on every read, and no loss of previously known data when the index is
//! temporarily unavailable.
//!
//! ## Architecture
//!
//! - [`IndexProvider`]: narrow capability trait over the external index;
//!   implemented by a host-side shim.
//! - [`RecencyCache`]: the ranked entry list plus a freshness flag. Owns no
//!   external resources.
//! - [`InvalidationListener`]: subscribes to change notifications and only
//!   flips the staleness flag; reconciliation cost is deferred to the next
//!   read.
//! - [`RefreshPolicy`]: decides whether a read should re-query or serve
//!   stale data.
//! - [`CacheController`]: composes the above into the single entry point
//!   consumers use (`ensure_fresh` / `read`), and owns the in-flight and
//!   coalescing guards.
//!
//! Data flows one way into the cache (query results) and one way out (reads
//! by the presentation layer); invalidation events flow sideways, only
//! flipping a flag. Nothing here is fatal to the host: failures degrade to
//! stale entries, an empty list, or an "unavailable" status.
//!
//! ## Example
//!
//! The cache and policy are plain synchronous state and can be exercised
//! directly:
//!
//! ```rust
//! use recents_core::{Entry, FreshnessState, RecencyCache, RefreshDecision, RefreshPolicy};
//!
//! let cache = RecencyCache::new(30);
//! assert_eq!(cache.state(), FreshnessState::StaleEmpty);
//!
//! cache.replace(vec![Entry::new("notes/today.md", "today")]);
//! assert_eq!(cache.state(), FreshnessState::Fresh);
//!
//! // Invalidation keeps last-known-good data around.
//! cache.invalidate();
//! assert_eq!(cache.state(), FreshnessState::StaleWithData);
//!
//! // With auto refresh disabled, a read serves the stale entries as-is.
//! let policy = RefreshPolicy;
//! let (entries, fresh) = cache.read();
//! assert_eq!(
//!     policy.decide(fresh, entries.is_empty(), false),
//!     RefreshDecision::ServeStale
//! );
//! ```
//!
//! The async side (wiring an [`IndexProvider`] and reading through
//! [`CacheController::ensure_fresh`]) runs on whatever executor the host
//! embeds; all operations are intended for a single cooperative scheduling
//! context, and the index query is the only suspending one.

/// The staleness-tracked recency cache
pub mod cache;
/// List configuration and persisted settings
pub mod config;
/// The cache controller and its flight guards
pub mod controller;
/// Error types and result aliases
pub mod error;
/// Capability interface over the external document index
pub mod index;
/// Invalidation subscriptions
pub mod listener;
/// Read-time refresh policy
pub mod policy;
/// Core data types
pub mod types;
/// Presentation-side contracts
pub mod view;

// Re-export commonly used types
pub use cache::RecencyCache;
pub use config::{
    DEFAULT_EXCLUDE_TAG, DEFAULT_MAX_ENTRIES, FileSettingsStore, ListConfig, Settings,
    SettingsStore,
};
pub use controller::{CacheController, InvalidationHandle};
pub use error::{Error, Result};
pub use index::{
    ChangeHandler, IndexEventKind, IndexProvider, RecencyQuery, SortDirection, SortKey,
    Subscription, rank,
};
pub use listener::InvalidationListener;
pub use policy::{RefreshDecision, RefreshPolicy};
pub use types::{DocumentMeta, Entry, FreshnessState, ListFrame, ListSnapshot, ListStatus};
pub use view::{RecentsPresenter, ViewHost, open_list_view};
