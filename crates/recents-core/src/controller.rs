//! The cache controller: the single entry point consumers use.
//!
//! Composes the cache, the refresh policy, the index provider, and the
//! invalidation listener. All mutation of [`RecencyCache`] happens here; the
//! presentation layer only reads through [`CacheController::read`] /
//! [`CacheController::ensure_fresh`] and reports missing entries back.
//!
//! The controller owns the two flags that make invalidation cheap:
//!
//! - `in_flight` guards `ensure_fresh` re-entrancy. A second read while a
//!   query is outstanding starts nothing and serves the current snapshot.
//! - `dirty` captures invalidations that arrive while a query is
//!   outstanding. On completion the result is still applied (it reflects the
//!   index at least as of query start), but the cache is not left marked
//!   fresh; exactly one follow-up query runs, no matter how many
//!   invalidations landed during the flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::cache::RecencyCache;
use crate::config::{ListConfig, Settings, SettingsStore};
use crate::error::{Error, Result};
use crate::index::{IndexEventKind, IndexProvider, RecencyQuery, rank};
use crate::listener::InvalidationListener;
use crate::policy::{RefreshDecision, RefreshPolicy};
use crate::types::{FreshnessState, ListFrame, ListSnapshot, ListStatus};
use crate::view::RecentsPresenter;

#[derive(Debug, Default)]
struct FlightState {
    in_flight: AtomicBool,
    dirty: AtomicBool,
    closed: AtomicBool,
}

/// Cheap clonable handle through which invalidations reach the cache.
///
/// Notification handlers flip staleness and, when a query is outstanding,
/// the dirty flag, and nothing else. Reconciliation cost is deferred to the
/// next read.
#[derive(Clone)]
pub struct InvalidationHandle {
    cache: Arc<RecencyCache>,
    flight: Arc<FlightState>,
}

impl InvalidationHandle {
    /// Record one invalidation event.
    pub fn notify(&self, kind: IndexEventKind) {
        self.cache.invalidate();
        if self.flight.in_flight.load(Ordering::SeqCst) {
            self.flight.dirty.store(true, Ordering::SeqCst);
        }
        debug!(?kind, "invalidation received, list marked stale");
    }
}

/// Owner of the recency list lifecycle.
///
/// Constructed once at startup with its collaborators injected, passed by
/// reference to whatever needs it, and torn down explicitly via
/// [`CacheController::shutdown`].
pub struct CacheController {
    provider: Arc<dyn IndexProvider>,
    cache: Arc<RecencyCache>,
    policy: RefreshPolicy,
    config: ListConfig,
    flight: Arc<FlightState>,
    settings: Mutex<Settings>,
    store: Box<dyn SettingsStore>,
    presenter: Mutex<Option<Arc<dyn RecentsPresenter>>>,
    listener: Mutex<Option<InvalidationListener>>,
}

impl CacheController {
    /// Build a controller, load settings, and attach the invalidation
    /// listener.
    pub fn new(
        provider: Arc<dyn IndexProvider>,
        store: Box<dyn SettingsStore>,
        config: ListConfig,
    ) -> Self {
        let settings = Settings::load_from(store.as_ref());
        let cache = Arc::new(RecencyCache::new(config.max_entries));
        let flight = Arc::new(FlightState::default());

        if provider.is_available() {
            debug!("external index available at startup");
        } else {
            info!("external index not available at startup, waiting for notifications");
        }

        let controller = Self {
            provider,
            cache,
            policy: RefreshPolicy,
            config,
            flight,
            settings: Mutex::new(settings),
            store,
            presenter: Mutex::new(None),
            listener: Mutex::new(None),
        };

        let listener = InvalidationListener::attach(
            controller.provider.as_ref(),
            controller.invalidation_handle(),
        );
        *lock(&controller.listener) = Some(listener);

        controller
    }

    /// Handle used by notification handlers to mark the cache stale.
    #[must_use]
    pub fn invalidation_handle(&self) -> InvalidationHandle {
        InvalidationHandle {
            cache: Arc::clone(&self.cache),
            flight: Arc::clone(&self.flight),
        }
    }

    /// Register the presentation consumer.
    pub fn attach_presenter(&self, presenter: Arc<dyn RecentsPresenter>) {
        *lock(&self.presenter) = Some(presenter);
    }

    /// Current snapshot without any refresh consideration. No side effects.
    #[must_use]
    pub fn read(&self) -> ListSnapshot {
        let (entries, fresh) = self.cache.read();
        let status = if fresh {
            ListStatus::Fresh
        } else {
            ListStatus::Stale
        };
        ListSnapshot { entries, status }
    }

    /// Derived freshness state of the cache.
    #[must_use]
    pub fn freshness(&self) -> FreshnessState {
        self.cache.state()
    }

    /// Whether stale reads may trigger a re-query.
    #[must_use]
    pub fn auto_refresh_enabled(&self) -> bool {
        lock(&self.settings).auto_refresh_enabled
    }

    /// The read-time entry point, called before every render.
    ///
    /// Applies the refresh policy, querying at most once (plus one coalesced
    /// follow-up when invalidations arrive mid-flight). Never fails: every
    /// error degrades to the best available snapshot.
    pub async fn ensure_fresh(&self) -> ListSnapshot {
        let (entries, fresh) = self.cache.read();
        let decision =
            self.policy
                .decide(fresh, entries.is_empty(), self.auto_refresh_enabled());

        match decision {
            RefreshDecision::Skip => {
                debug!("list is up to date, not querying");
                ListSnapshot {
                    entries,
                    status: ListStatus::Fresh,
                }
            },
            RefreshDecision::ServeStale => {
                debug!("list stale but auto refresh disabled, serving as-is");
                ListSnapshot {
                    entries,
                    status: ListStatus::Stale,
                }
            },
            RefreshDecision::Query => {
                debug!("list stale or empty, querying index");
                self.run_guarded_query().await
            },
        }
    }

    /// The explicit user-facing refresh action.
    ///
    /// Unconditionally queries and replaces, bypassing the policy table.
    pub async fn refresh(&self) -> ListSnapshot {
        debug!("manual refresh requested");
        self.run_guarded_query().await
    }

    /// Ask the controller for a fresh-enough snapshot and push it to the
    /// attached presenter.
    pub async fn redraw(&self) {
        let snapshot = self.ensure_fresh().await;
        self.render(snapshot);
    }

    /// Flip the auto-refresh toggle and persist it. Enabling also refreshes
    /// and re-renders immediately.
    pub async fn set_auto_refresh(&self, enabled: bool) {
        {
            lock(&self.settings).auto_refresh_enabled = enabled;
        }
        let settings = *lock(&self.settings);
        if let Err(e) = self.store.save(&settings) {
            warn!(error = %e, "failed to persist settings");
        }

        if enabled {
            let snapshot = self.refresh().await;
            self.render(snapshot);
        }
    }

    /// Report that activating `path` found no underlying document.
    ///
    /// Prunes exactly that entry and re-renders. The rest of the cache is
    /// not invalidated: a missing single item does not imply the whole list
    /// is stale.
    pub fn on_entry_missing(&self, path: &str) {
        if self.cache.remove_path(path) {
            warn!(path, "document missing, pruned from list");
        } else {
            debug!(path, "missing document was not in the list");
        }
        self.render(self.read());
    }

    /// Tear the controller down: release subscriptions, detach the
    /// presenter, and discard any in-flight query result.
    pub fn shutdown(&self) {
        self.flight.closed.store(true, Ordering::SeqCst);
        lock(&self.listener).take();
        lock(&self.presenter).take();
        debug!("controller shut down");
    }

    /// Run a query cycle unless one is already outstanding.
    async fn run_guarded_query(&self) -> ListSnapshot {
        if self.flight.in_flight.swap(true, Ordering::SeqCst) {
            debug!("query already in flight, serving current snapshot");
            return self.read();
        }
        let snapshot = self.run_query_cycle().await;
        self.flight.in_flight.store(false, Ordering::SeqCst);
        snapshot
    }

    /// One query, plus at most one coalesced follow-up.
    async fn run_query_cycle(&self) -> ListSnapshot {
        match self.query_once().await {
            Ok(()) => {
                if self.flight.dirty.swap(false, Ordering::SeqCst) {
                    // Invalidations arrived while the query was outstanding;
                    // the applied result may already be behind.
                    self.cache.invalidate();
                    debug!("invalidated during flight, issuing one follow-up query");
                    if let Err(e) = self.query_once().await {
                        self.log_query_failure(&e);
                    }
                    if self.flight.dirty.swap(false, Ordering::SeqCst) {
                        // Arrived during the follow-up. Never chain further;
                        // the next read reconciles.
                        self.cache.invalidate();
                    }
                }
                self.read()
            },
            Err(Error::IndexUnavailable) => {
                self.flight.dirty.store(false, Ordering::SeqCst);
                info!("external index unavailable, keeping last known entries");
                let (entries, _) = self.cache.read();
                ListSnapshot {
                    entries,
                    status: ListStatus::Unavailable,
                }
            },
            Err(e) => {
                self.flight.dirty.store(false, Ordering::SeqCst);
                self.log_query_failure(&e);
                self.read()
            },
        }
    }

    /// Query the index once and apply the ranked result.
    async fn query_once(&self) -> Result<()> {
        if !self.provider.is_available() {
            return Err(Error::IndexUnavailable);
        }

        let request = RecencyQuery::for_config(&self.config);
        let documents = self.provider.query(&request).await?;

        if self.flight.closed.load(Ordering::SeqCst) {
            debug!("controller torn down mid-query, discarding result");
            return Ok(());
        }

        let entries = rank(documents, &request);
        debug!(count = entries.len(), "applying query result");
        self.cache.replace(entries);
        Ok(())
    }

    fn log_query_failure(&self, error: &Error) {
        warn!(
            error = %error,
            category = error.category(),
            "recency query failed, keeping last known entries"
        );
    }

    fn render(&self, snapshot: ListSnapshot) {
        let presenter = lock(&self.presenter).clone();
        if let Some(presenter) = presenter {
            let frame = ListFrame {
                active_path: presenter.active_document(),
                entries: snapshot.entries,
                status: snapshot.status,
            };
            presenter.render(&frame);
        } else {
            debug!("no presenter attached, skipping render");
        }
    }
}

impl std::fmt::Debug for CacheController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheController")
            .field("config", &self.config)
            .field("state", &self.cache.state())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
