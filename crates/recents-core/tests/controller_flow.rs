//! End-to-end flows through the public API: a scripted index provider, a
//! recording presenter, and the controller composed the way a host would.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use recents_core::{
    CacheController, ChangeHandler, DocumentMeta, FreshnessState, IndexEventKind, IndexProvider,
    ListConfig, ListStatus, RecencyQuery, RecentsPresenter, Result, Settings, SettingsStore,
    Subscription,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct ScriptedIndex {
    available: AtomicBool,
    docs: Mutex<Vec<DocumentMeta>>,
    queries: AtomicUsize,
    handlers: Mutex<Vec<(IndexEventKind, ChangeHandler)>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedIndex {
    fn with_docs(docs: Vec<DocumentMeta>) -> Arc<Self> {
        let index = Self {
            available: AtomicBool::new(true),
            ..Self::default()
        };
        *lock(&index.docs) = docs;
        Arc::new(index)
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn gate_next_query(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.gate) = Some(Arc::clone(&gate));
        gate
    }

    fn fire(&self, kind: IndexEventKind) {
        let handlers = lock(&self.handlers);
        for (subscribed, handler) in handlers.iter() {
            if *subscribed == kind {
                handler(kind);
            }
        }
    }
}

#[async_trait::async_trait]
impl IndexProvider for ScriptedIndex {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn query(&self, _request: &RecencyQuery) -> Result<Vec<DocumentMeta>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let gate = lock(&self.gate).take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(lock(&self.docs).clone())
    }

    fn subscribe(&self, kind: IndexEventKind, handler: ChangeHandler) -> Subscription {
        lock(&self.handlers).push((kind, handler));
        Subscription::noop()
    }
}

struct MemoryStore(Mutex<Settings>);

impl MemoryStore {
    fn auto_refresh(enabled: bool) -> Box<Self> {
        Box::new(Self(Mutex::new(Settings {
            auto_refresh_enabled: enabled,
        })))
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(*lock(&self.0))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *lock(&self.0) = *settings;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPresenter {
    frames: Mutex<Vec<recents_core::ListFrame>>,
}

impl RecentsPresenter for RecordingPresenter {
    fn active_document(&self) -> Option<String> {
        None
    }

    fn render(&self, frame: &recents_core::ListFrame) {
        lock(&self.frames).push(frame.clone());
    }
}

fn doc(path: &str, minute: u32) -> DocumentMeta {
    DocumentMeta {
        path: path.to_string(),
        name: path
            .rsplit('/')
            .next()
            .unwrap_or(path)
            .trim_end_matches(".md")
            .to_string(),
        modified_at: ts(minute),
        tags: Vec::new(),
    }
}

fn ts(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 9, minute, 0).unwrap()
}

#[tokio::test]
async fn empty_cache_first_read_queries_even_with_auto_refresh_disabled() {
    let index = ScriptedIndex::with_docs(vec![
        doc("notes/a.md", 10),
        doc("notes/b.md", 50),
        doc("notes/c.md", 30),
        doc("notes/d.md", 20),
        doc("notes/e.md", 40),
    ]);
    let controller = CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(false),
        ListConfig::default(),
    );

    let snapshot = controller.ensure_fresh().await;

    assert_eq!(index.queries(), 1);
    assert_eq!(snapshot.status, ListStatus::Fresh);
    let paths: Vec<_> = snapshot.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "notes/b.md",
            "notes/e.md",
            "notes/c.md",
            "notes/d.md",
            "notes/a.md"
        ]
    );
    assert_eq!(controller.freshness(), FreshnessState::Fresh);
}

#[tokio::test]
async fn stale_with_data_serves_stale_when_auto_refresh_disabled() {
    let index = ScriptedIndex::with_docs(vec![
        doc("notes/a.md", 1),
        doc("notes/b.md", 2),
        doc("notes/c.md", 3),
    ]);
    let controller = CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(false),
        ListConfig::default(),
    );

    controller.ensure_fresh().await;
    index.fire(IndexEventKind::ItemChanged);
    assert_eq!(controller.freshness(), FreshnessState::StaleWithData);

    let snapshot = controller.ensure_fresh().await;

    assert_eq!(index.queries(), 1, "no query may run for a stale read");
    assert_eq!(snapshot.entries.len(), 3);
    assert_eq!(snapshot.status, ListStatus::Stale);
    assert_eq!(controller.freshness(), FreshnessState::StaleWithData);
}

#[tokio::test]
async fn stale_with_data_requeries_when_auto_refresh_enabled() {
    let index = ScriptedIndex::with_docs(vec![
        doc("notes/a.md", 1),
        doc("notes/b.md", 2),
        doc("notes/c.md", 3),
    ]);
    let controller = CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(true),
        ListConfig::default(),
    );

    controller.ensure_fresh().await;
    index.fire(IndexEventKind::ItemChanged);

    // The index now knows about a newer document.
    lock(&index.docs).push(doc("notes/new.md", 59));

    let snapshot = controller.ensure_fresh().await;

    assert_eq!(index.queries(), 2);
    assert_eq!(snapshot.status, ListStatus::Fresh);
    assert_eq!(snapshot.entries[0].path, "notes/new.md");
    assert_eq!(controller.freshness(), FreshnessState::Fresh);
}

#[tokio::test]
async fn two_invalidations_during_flight_yield_exactly_one_follow_up() {
    let index = ScriptedIndex::with_docs(vec![doc("notes/a.md", 1)]);
    let controller = Arc::new(CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(true),
        ListConfig::default(),
    ));

    let gate = index.gate_next_query();
    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.ensure_fresh().await }
    });

    while index.queries() == 0 {
        tokio::task::yield_now().await;
    }

    index.fire(IndexEventKind::ItemChanged);
    index.fire(IndexEventKind::ItemChanged);

    gate.notify_one();
    let snapshot = task.await.expect("ensure_fresh task");

    assert_eq!(index.queries(), 2);
    assert_eq!(snapshot.status, ListStatus::Fresh);

    // The dirty flag is clear: the next read performs no further query.
    controller.ensure_fresh().await;
    assert_eq!(index.queries(), 2);
}

#[tokio::test]
async fn unavailable_index_returns_previous_entries_with_status() {
    let index = ScriptedIndex::with_docs(vec![doc("notes/a.md", 1), doc("notes/b.md", 2)]);
    let controller = CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(true),
        ListConfig::default(),
    );

    let before = controller.ensure_fresh().await;
    index.available.store(false, Ordering::SeqCst);
    index.fire(IndexEventKind::ReindexComplete);

    let snapshot = controller.ensure_fresh().await;

    assert_eq!(snapshot.status, ListStatus::Unavailable);
    assert_eq!(snapshot.entries, before.entries);
    assert_eq!(index.queries(), 1, "unavailable short-circuits the query");
}

#[tokio::test]
async fn missing_entry_is_pruned_in_place() {
    let index = ScriptedIndex::with_docs(vec![
        doc("notes/a.md", 40),
        doc("notes/x.md", 30),
        doc("notes/b.md", 20),
        doc("notes/c.md", 10),
    ]);
    let controller = CacheController::new(
        Arc::clone(&index) as Arc<dyn IndexProvider>,
        MemoryStore::auto_refresh(true),
        ListConfig::default(),
    );
    let presenter = Arc::new(RecordingPresenter::default());
    controller.attach_presenter(presenter.clone() as Arc<dyn RecentsPresenter>);

    controller.ensure_fresh().await;
    controller.on_entry_missing("notes/x.md");

    let snapshot = controller.read();
    let paths: Vec<_> = snapshot.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["notes/a.md", "notes/b.md", "notes/c.md"]);
    assert_eq!(snapshot.status, ListStatus::Fresh);

    let frames = lock(&presenter.frames);
    assert_eq!(frames.last().expect("rendered frame").entries.len(), 3);
    assert_eq!(index.queries(), 1, "pruning must not trigger a query");
}
