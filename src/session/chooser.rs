//! The chooser session: one open connection at a time, a selection that
//! outlives connection switches, and a completion contract that resolves
//! exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::context::{BrowsingContext, ContextSnapshot};
use super::selection::{FileRef, SelectionAccumulator, SelectionMode};
use crate::error::AppError;
use crate::store::FileSystemStore;

/// How a chooser session ended.
///
/// `Confirmed` carries the resolved selection, which may legitimately be
/// empty; `Cancelled` means no choice was made at all.
#[derive(Clone, Debug, PartialEq)]
pub enum ChooserOutcome {
    Confirmed(Vec<FileRef>),
    Cancelled,
}

impl ChooserOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChooserOutcome::Cancelled)
    }

    pub fn files(&self) -> &[FileRef] {
        match self {
            ChooserOutcome::Confirmed(files) => files,
            ChooserOutcome::Cancelled => &[],
        }
    }
}

type FinishCallback = Box<dyn FnOnce(ChooserOutcome) + Send + 'static>;

/// Where session failures go instead of being thrown at callers.
///
/// `expected` failures are recoverable, user-facing conditions (a host that
/// refused the handshake); unexpected ones indicate something went wrong
/// internally but the session stays operable either way.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &AppError, expected: bool);
}

/// Default sink: tracing only.
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, error: &AppError, expected: bool) {
        if expected {
            warn!("Session error: {}", error);
        } else {
            error!("Unexpected session error: {}", error);
        }
    }
}

/// Shared busy indicator for an in-flight connection handshake.
#[derive(Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }
}

/// Scoped acquisition of a busy flag: raised on creation, lowered on drop,
/// so every exit path of the handshake task clears it.
struct BusyGuard(Option<BusyFlag>);

impl BusyGuard {
    fn acquire(flag: Option<BusyFlag>) -> Self {
        if let Some(flag) = &flag {
            flag.set(true);
        }
        Self(flag)
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(flag) = &self.0 {
            flag.set(false);
        }
    }
}

struct ChooserState {
    current: Option<BrowsingContext>,
    accumulator: SelectionAccumulator,
    finished: bool,
    /// Bumped for every accepted open request; a completing handshake may
    /// only install its context while its epoch is still the latest.
    open_epoch: u64,
    open_cancel: Option<CancellationToken>,
    on_finish: Option<FinishCallback>,
}

/// Orchestrates one interactive chooser session.
///
/// All state lives behind a single mutex; background handshake tasks post
/// their results back through it, so every mutation of the current context,
/// the accumulator, and the finished flag is serialized.
pub struct ChooserSession {
    mode: SelectionMode,
    state: Arc<Mutex<ChooserState>>,
    sink: Arc<dyn ErrorSink>,
}

impl ChooserSession {
    pub fn new(mode: SelectionMode) -> Self {
        Self::with_sink(mode, Arc::new(LogSink))
    }

    pub fn with_sink(mode: SelectionMode, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            mode,
            state: Arc::new(Mutex::new(ChooserState {
                current: None,
                accumulator: SelectionAccumulator::new(),
                finished: false,
                open_epoch: 0,
                open_cancel: None,
                on_finish: None,
            })),
            sink,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Register the completion callback. It fires exactly once, when the
    /// session is finished or cancelled; registering after resolution is a
    /// no-op.
    pub async fn on_finish(&self, callback: impl FnOnce(ChooserOutcome) + Send + 'static) {
        let mut st = self.state.lock().await;
        if st.finished {
            debug!("on_finish registered after session resolution, dropping");
            return;
        }
        st.on_finish = Some(Box::new(callback));
    }

    /// Open `store` for browsing, replacing the current context on success.
    ///
    /// Returns after dispatching the handshake to a background task. The
    /// most recently requested open wins: an older in-flight handshake is
    /// cancelled, and if it still produces a view, that view is closed
    /// instead of installed. Opening the already-open connection is a no-op
    /// and does not touch `busy`.
    pub async fn open(
        &self,
        store: Arc<dyn FileSystemStore>,
        initial_path: Option<String>,
        busy: Option<BusyFlag>,
    ) {
        if !store.is_usable() {
            debug!("Ignoring open of unusable store '{}'", store.display_name());
            return;
        }

        let (epoch, cancel) = {
            let mut st = self.state.lock().await;
            if st.finished {
                return;
            }
            // Don't open same system again
            if let Some(current) = &st.current
                && current.connection_id() == store.id()
            {
                return;
            }
            if let Some(previous) = st.open_cancel.take() {
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            st.open_cancel = Some(cancel.clone());
            st.open_epoch += 1;
            (st.open_epoch, cancel)
        };

        let busy_guard = BusyGuard::acquire(busy);
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);

        tokio::spawn(async move {
            let _busy = busy_guard;
            let name = store.display_name().to_string();

            let opened = tokio::select! {
                _ = cancel.cancelled() => {
                    // Dropping the handshake future tears the half-open
                    // connection down.
                    debug!("Open of '{}' superseded before handshake completed", name);
                    return;
                }
                result = store.open() => result,
            };

            let view = match opened {
                Ok(view) => view,
                Err(e) => {
                    sink.report(&e, true);
                    return;
                }
            };

            let context =
                match BrowsingContext::new(store.id().to_string(), name, view, initial_path).await
                {
                    Ok(context) => context,
                    Err(e) => {
                        sink.report(&e, false);
                        return;
                    }
                };

            let previous = {
                let mut st = state.lock().await;
                if st.finished || st.open_epoch != epoch {
                    drop(st);
                    // A finished session never acquires a new context, and a
                    // superseded open never overwrites a newer one.
                    context.close().await;
                    return;
                }
                st.current.replace(context)
            };

            // Teardown strictly after the replacement is published.
            if let Some(previous) = previous {
                previous.close().await;
            }
        });
    }

    /// Replace the current context's selected set and fold it into the
    /// session's accumulated selection. No-op once finished or while no
    /// context is open.
    pub async fn record_selection(&self, entries: Vec<FileRef>) {
        let mut st = self.state.lock().await;
        if st.finished {
            return;
        }
        let Some(context) = st.current.as_mut() else {
            return;
        };
        let context_id = context.connection_id().to_string();
        let accepted = self.mode.accept(entries);
        context.set_local_selection(accepted.clone());
        st.accumulator.record(self.mode, &context_id, accepted);
    }

    /// Resolve the session with the accumulated selection.
    pub async fn finish(&self) {
        self.complete(true).await;
    }

    /// Resolve the session with "no choice made".
    pub async fn cancel(&self) {
        self.complete(false).await;
    }

    async fn complete(&self, confirmed: bool) {
        let (callback, outcome, previous) = {
            let mut st = self.state.lock().await;
            if st.finished {
                return;
            }
            st.finished = true;
            let outcome = if confirmed {
                ChooserOutcome::Confirmed(st.accumulator.resolve(self.mode))
            } else {
                ChooserOutcome::Cancelled
            };
            (st.on_finish.take(), outcome, st.current.take())
        };

        if let Some(callback) = callback {
            callback(outcome);
        }
        if let Some(previous) = previous {
            previous.close().await;
        }
    }

    pub async fn is_finished(&self) -> bool {
        self.state.lock().await.finished
    }

    /// Render snapshot of the current context, if one is open.
    pub async fn snapshot(&self) -> Option<ContextSnapshot> {
        self.state
            .lock()
            .await
            .current
            .as_ref()
            .map(|c| c.snapshot())
    }

    /// The live accumulated selection, in insertion order.
    pub async fn accumulated(&self) -> Vec<FileRef> {
        self.state.lock().await.accumulator.entries().to_vec()
    }

    /// Descend into a directory of the current listing. Failures are
    /// reported through the sink, never returned.
    pub async fn enter(&self, name: &str) {
        let mut st = self.state.lock().await;
        if let Some(context) = st.current.as_mut()
            && let Err(e) = context.enter(name).await
        {
            self.sink.report(&e, true);
        }
    }

    /// Move the current context to its parent directory.
    pub async fn ascend(&self) {
        let mut st = self.state.lock().await;
        if let Some(context) = st.current.as_mut()
            && let Err(e) = context.ascend().await
        {
            self.sink.report(&e, true);
        }
    }

    /// Return the current context to the previously visited directory.
    pub async fn back(&self) {
        let mut st = self.state.lock().await;
        if let Some(context) = st.current.as_mut()
            && let Err(e) = context.back().await
        {
            self.sink.report(&e, true);
        }
    }

    /// Re-read the current context's directory listing.
    pub async fn refresh(&self) {
        let mut st = self.state.lock().await;
        if let Some(context) = st.current.as_mut()
            && let Err(e) = context.refresh().await
        {
            self.sink.report(&e, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
    use std::time::Duration;

    use futures::future::BoxFuture;
    use tokio::time::sleep;

    use super::*;
    use crate::error::Result;
    use crate::store::{EntryKind, FileEntry, FileSystemView, slash_parent};

    struct FakeView {
        canonicalize_delay: Option<Duration>,
        fail: bool,
        closes: Arc<AtomicUsize>,
    }

    impl FileSystemView for FakeView {
        fn read_dir<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<FileEntry>>> {
            Box::pin(async move {
                let _ = path;
                Ok(vec![
                    FileEntry {
                        name: "etc/".to_string(),
                        path: "/etc".to_string(),
                        kind: EntryKind::Directory,
                        is_hidden: false,
                        size: None,
                        modified: None,
                    },
                    FileEntry {
                        name: "hosts".to_string(),
                        path: "/etc/hosts".to_string(),
                        kind: EntryKind::File,
                        is_hidden: false,
                        size: Some(42),
                        modified: None,
                    },
                ])
            })
        }

        fn canonicalize<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<String>> {
            Box::pin(async move {
                if let Some(delay) = self.canonicalize_delay {
                    sleep(delay).await;
                }
                if self.fail {
                    return Err(AppError::SftpError("listing unavailable".to_string()));
                }
                if path == "." {
                    Ok("/".to_string())
                } else {
                    Ok(path.to_string())
                }
            })
        }

        fn parent(&self, path: &str) -> Option<String> {
            slash_parent(path)
        }

        fn close<'a>(&'a mut self) -> BoxFuture<'a, Result<()>> {
            Box::pin(async move {
                self.closes.fetch_add(1, SeqCst);
                Ok(())
            })
        }
    }

    struct FakeStore {
        id: String,
        usable: bool,
        fail_open: bool,
        open_delay: Option<Duration>,
        view_delay: Option<Duration>,
        view_fail: bool,
        opens: Arc<AtomicUsize>,
        views: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    impl FakeStore {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                usable: true,
                fail_open: false,
                open_delay: None,
                view_delay: None,
                view_fail: false,
                opens: Arc::new(AtomicUsize::new(0)),
                views: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl FileSystemStore for FakeStore {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            &self.id
        }

        fn is_usable(&self) -> bool {
            self.usable
        }

        fn open(&self) -> BoxFuture<'_, Result<Box<dyn FileSystemView>>> {
            Box::pin(async move {
                self.opens.fetch_add(1, SeqCst);
                if let Some(delay) = self.open_delay {
                    sleep(delay).await;
                }
                if self.fail_open {
                    return Err(AppError::ConnectionError("connection refused".to_string()));
                }
                self.views.fetch_add(1, SeqCst);
                Ok(Box::new(FakeView {
                    canonicalize_delay: self.view_delay,
                    fail: self.view_fail,
                    closes: Arc::clone(&self.closes),
                }) as Box<dyn FileSystemView>)
            })
        }
    }

    struct CollectingSink {
        reports: StdMutex<Vec<(String, bool)>>,
    }

    impl CollectingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                reports: StdMutex::new(Vec::new()),
            })
        }

        fn reported(&self) -> Vec<(String, bool)> {
            self.reports.lock().unwrap().clone()
        }
    }

    impl ErrorSink for CollectingSink {
        fn report(&self, error: &AppError, expected: bool) {
            self.reports
                .lock()
                .unwrap()
                .push((error.to_string(), expected));
        }
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..400 {
            if cond() {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for condition");
    }

    async fn wait_for_context(session: &ChooserSession, id: &str) {
        for _ in 0..400 {
            if let Some(snapshot) = session.snapshot().await
                && snapshot.connection_id == id
            {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("context '{id}' never became current");
    }

    async fn settle() {
        sleep(Duration::from_millis(60)).await;
    }

    async fn capture_outcome(session: &ChooserSession) -> Arc<StdMutex<Option<ChooserOutcome>>> {
        let slot = Arc::new(StdMutex::new(None));
        let captured = Arc::clone(&slot);
        session
            .on_finish(move |outcome| {
                *captured.lock().unwrap() = Some(outcome);
            })
            .await;
        slot
    }

    fn file_ref(conn: &str, path: &str) -> FileRef {
        FileRef::new(conn, path, EntryKind::File)
    }

    #[tokio::test]
    async fn test_open_installs_context() {
        let session = ChooserSession::new(SelectionMode::Any);
        session.open(Arc::new(FakeStore::new("a")), None, None).await;
        wait_for_context(&session, "a").await;

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.current_path, "/");
        assert_eq!(snapshot.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_open_same_connection_is_noop() {
        let session = ChooserSession::new(SelectionMode::Any);
        let store = FakeStore::new("a");
        let opens = Arc::clone(&store.opens);
        let store: Arc<dyn FileSystemStore> = Arc::new(store);

        session.open(Arc::clone(&store), None, None).await;
        wait_for_context(&session, "a").await;

        let busy = BusyFlag::new();
        session.open(store, None, Some(busy.clone())).await;
        assert!(!busy.is_busy());
        settle().await;
        assert_eq!(opens.load(SeqCst), 1);
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn test_unusable_store_is_ignored() {
        let session = ChooserSession::new(SelectionMode::Any);
        let mut store = FakeStore::new("a");
        store.usable = false;
        let opens = Arc::clone(&store.opens);

        session.open(Arc::new(store), None, None).await;
        settle().await;
        assert_eq!(opens.load(SeqCst), 0);
        assert!(session.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_open_failure_leaves_current_untouched() {
        let sink = CollectingSink::new();
        let session = ChooserSession::with_sink(SelectionMode::Any, sink.clone());

        session.open(Arc::new(FakeStore::new("a")), None, None).await;
        wait_for_context(&session, "a").await;

        let mut failing = FakeStore::new("b");
        failing.fail_open = true;
        session.open(Arc::new(failing), None, None).await;
        settle().await;

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.connection_id, "a");
        let reports = sink.reported();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].1, "handshake failure must be reported as expected");
    }

    #[tokio::test]
    async fn test_busy_clears_on_success_and_failure() {
        let session = ChooserSession::new(SelectionMode::Any);

        let mut store = FakeStore::new("a");
        store.open_delay = Some(Duration::from_millis(40));
        let busy = BusyFlag::new();
        session.open(Arc::new(store), None, Some(busy.clone())).await;
        assert!(busy.is_busy());
        wait_for_context(&session, "a").await;
        let busy_probe = busy.clone();
        wait_until(move || !busy_probe.is_busy()).await;

        let mut failing = FakeStore::new("b");
        failing.fail_open = true;
        failing.open_delay = Some(Duration::from_millis(20));
        let busy = BusyFlag::new();
        session.open(Arc::new(failing), None, Some(busy.clone())).await;
        assert!(busy.is_busy());
        let busy_probe = busy.clone();
        wait_until(move || !busy_probe.is_busy()).await;
    }

    #[tokio::test]
    async fn test_completion_fires_exactly_once() {
        let session = ChooserSession::new(SelectionMode::Any);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        session.on_finish(move |_| {
            counter.fetch_add(1, SeqCst);
        })
        .await;

        session.finish().await;
        session.finish().await;
        session.cancel().await;
        assert_eq!(fired.load(SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_distinguishable_from_confirmed_empty() {
        let cancelled = ChooserSession::new(SelectionMode::Any);
        let cancelled_outcome = capture_outcome(&cancelled).await;
        cancelled.cancel().await;

        let confirmed = ChooserSession::new(SelectionMode::Any);
        let confirmed_outcome = capture_outcome(&confirmed).await;
        confirmed.finish().await;

        let cancelled_outcome = cancelled_outcome.lock().unwrap().clone().unwrap();
        let confirmed_outcome = confirmed_outcome.lock().unwrap().clone().unwrap();
        assert!(cancelled_outcome.is_cancelled());
        assert!(!confirmed_outcome.is_cancelled());
        assert!(confirmed_outcome.files().is_empty());
        assert_ne!(cancelled_outcome, confirmed_outcome);
    }

    #[tokio::test]
    async fn test_single_file_scenario() {
        let session = ChooserSession::new(SelectionMode::SingleFile);
        let outcome = capture_outcome(&session).await;

        session.open(Arc::new(FakeStore::new("connA")), None, None).await;
        wait_for_context(&session, "connA").await;

        session
            .record_selection(vec![file_ref("connA", "/etc/hosts")])
            .await;
        session.finish().await;

        let outcome = outcome.lock().unwrap().clone().unwrap();
        assert_eq!(
            outcome,
            ChooserOutcome::Confirmed(vec![file_ref("connA", "/etc/hosts")])
        );
    }

    #[tokio::test]
    async fn test_multiple_connections_scenario() {
        let session = ChooserSession::new(SelectionMode::MultipleFiles);
        let outcome = capture_outcome(&session).await;

        session.open(Arc::new(FakeStore::new("a")), None, None).await;
        wait_for_context(&session, "a").await;
        session.record_selection(vec![file_ref("a", "/a/one")]).await;

        session.open(Arc::new(FakeStore::new("b")), None, None).await;
        wait_for_context(&session, "b").await;
        session.record_selection(vec![file_ref("b", "/b/two")]).await;

        session.finish().await;
        let outcome = outcome.lock().unwrap().clone().unwrap();
        assert_eq!(
            outcome.files(),
            &[file_ref("a", "/a/one"), file_ref("b", "/b/two")]
        );
    }

    #[tokio::test]
    async fn test_selection_survives_context_switch() {
        let session = ChooserSession::new(SelectionMode::MultipleFiles);

        let store_a = FakeStore::new("a");
        let closes_a = Arc::clone(&store_a.closes);
        session.open(Arc::new(store_a), None, None).await;
        wait_for_context(&session, "a").await;
        session.record_selection(vec![file_ref("a", "/a/one")]).await;

        session.open(Arc::new(FakeStore::new("b")), None, None).await;
        wait_for_context(&session, "b").await;

        // The superseded context has been torn down, its selection has not.
        wait_until(move || closes_a.load(SeqCst) == 1).await;
        assert_eq!(session.accumulated().await, vec![file_ref("a", "/a/one")]);
    }

    #[tokio::test]
    async fn test_superseded_open_result_is_discarded_and_closed() {
        let session = ChooserSession::new(SelectionMode::Any);

        // Slow context setup: the handshake completes instantly, then the
        // initial listing stalls long enough for a newer request to win.
        let mut slow = FakeStore::new("slow");
        slow.view_delay = Some(Duration::from_millis(80));
        let slow_opens = Arc::clone(&slow.opens);
        let slow_closes = Arc::clone(&slow.closes);

        session.open(Arc::new(slow), None, None).await;
        let probe = Arc::clone(&slow_opens);
        wait_until(move || probe.load(SeqCst) == 1).await;

        session.open(Arc::new(FakeStore::new("fast")), None, None).await;
        wait_for_context(&session, "fast").await;

        wait_until(move || slow_closes.load(SeqCst) == 1).await;
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.connection_id, "fast");
    }

    #[tokio::test]
    async fn test_in_flight_handshake_aborted_by_newer_request() {
        let session = ChooserSession::new(SelectionMode::Any);

        let mut slow = FakeStore::new("slow");
        slow.open_delay = Some(Duration::from_millis(200));
        let slow_opens = Arc::clone(&slow.opens);
        let slow_views = Arc::clone(&slow.views);

        session.open(Arc::new(slow), None, None).await;
        let probe = Arc::clone(&slow_opens);
        wait_until(move || probe.load(SeqCst) == 1).await;

        session.open(Arc::new(FakeStore::new("fast")), None, None).await;
        wait_for_context(&session, "fast").await;
        settle().await;

        // The superseded handshake was dropped before producing a view.
        assert_eq!(slow_views.load(SeqCst), 0);
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.connection_id, "fast");
    }

    #[tokio::test]
    async fn test_finish_while_handshake_in_flight_closes_result() {
        let session = ChooserSession::new(SelectionMode::Any);
        let outcome = capture_outcome(&session).await;

        let mut store = FakeStore::new("late");
        store.view_delay = Some(Duration::from_millis(80));
        let opens = Arc::clone(&store.opens);
        let closes = Arc::clone(&store.closes);

        session.open(Arc::new(store), None, None).await;
        let probe = Arc::clone(&opens);
        wait_until(move || probe.load(SeqCst) == 1).await;

        session.finish().await;
        assert!(outcome.lock().unwrap().is_some());

        // The late-arriving context is closed, never installed.
        wait_until(move || closes.load(SeqCst) == 1).await;
        assert!(session.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_context_setup_failure_closes_view_and_reports_unexpected() {
        let sink = CollectingSink::new();
        let session = ChooserSession::with_sink(SelectionMode::Any, sink.clone());

        let mut store = FakeStore::new("broken");
        store.view_fail = true;
        let closes = Arc::clone(&store.closes);

        session.open(Arc::new(store), None, None).await;
        wait_until(move || closes.load(SeqCst) == 1).await;

        assert!(session.snapshot().await.is_none());
        let reports = sink.reported();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].1, "setup failure is reported as unexpected");
    }

    #[tokio::test]
    async fn test_record_selection_after_finish_is_noop() {
        let session = ChooserSession::new(SelectionMode::Any);
        session.open(Arc::new(FakeStore::new("a")), None, None).await;
        wait_for_context(&session, "a").await;

        session.finish().await;
        session.record_selection(vec![file_ref("a", "/late")]).await;
        assert!(session.accumulated().await.is_empty());
    }

    #[tokio::test]
    async fn test_directory_mode_rejects_files_at_record() {
        let session = ChooserSession::new(SelectionMode::Directory);
        session.open(Arc::new(FakeStore::new("a")), None, None).await;
        wait_for_context(&session, "a").await;

        session
            .record_selection(vec![
                FileRef::new("a", "/etc", EntryKind::Directory),
                file_ref("a", "/etc/hosts"),
            ])
            .await;

        assert_eq!(
            session.accumulated().await,
            vec![FileRef::new("a", "/etc", EntryKind::Directory)]
        );
    }
}
