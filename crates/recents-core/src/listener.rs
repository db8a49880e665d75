//! Subscription glue between the external index and the cache.
//!
//! The listener subscribes to both notification kinds and forwards them to
//! an [`InvalidationHandle`]; it never performs work itself. Bursts of
//! per-item notifications (bulk edits, a full reindex) therefore cost one
//! flag flip each; reconciliation is deferred to the next read.
//!
//! Subscriptions are scoped: each handle releases itself on drop, so
//! dropping the listener (or the controller that owns it) releases every
//! subscription on all exit paths.

use tracing::debug;

use crate::controller::InvalidationHandle;
use crate::index::{IndexEventKind, IndexProvider, Subscription};

/// Holds the live subscriptions for both change notification kinds.
#[derive(Debug)]
pub struct InvalidationListener {
    subscriptions: Vec<Subscription>,
}

impl InvalidationListener {
    /// Subscribe to `ReindexComplete` and `ItemChanged` on the provider,
    /// wiring both to the given handle.
    #[must_use]
    pub fn attach(provider: &dyn IndexProvider, handle: InvalidationHandle) -> Self {
        let reindex = provider.subscribe(IndexEventKind::ReindexComplete, {
            let handle = handle.clone();
            Box::new(move |kind| handle.notify(kind))
        });
        let item_changed = provider.subscribe(
            IndexEventKind::ItemChanged,
            Box::new(move |kind| handle.notify(kind)),
        );

        debug!("invalidation listener attached");
        Self {
            subscriptions: vec![reindex, item_changed],
        }
    }

    /// Number of live subscriptions held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
