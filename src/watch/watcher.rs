// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::fs::FileSystem;
use crate::watch::hash::HashGate;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching; a new watch must be spawned to resume.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Settings for turning raw notify events into triggers.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub debounce: Duration,
    pub use_hash: bool,
}

/// Everything the event loop needs besides its channels.
#[derive(Debug, Clone)]
pub struct EventFilter {
    root: PathBuf,
    profile: Arc<WatchProfile>,
    options: WatchOptions,
    fs: Arc<dyn FileSystem>,
}

impl EventFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        profile: WatchProfile,
        options: WatchOptions,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            root: root.into(),
            profile: Arc::new(profile),
            options,
            fs,
        }
    }

    /// Paths of `event` that should cause a rebuild.
    ///
    /// Access events are dropped: the compiler reading sources must not
    /// trigger another compile.
    pub fn relevant_paths(&self, event: &Event) -> Vec<PathBuf> {
        if matches!(event.kind, EventKind::Access(_)) {
            return Vec::new();
        }
        event
            .paths
            .iter()
            .filter(|p| self.profile.matches_path(&self.root, p))
            .cloned()
            .collect()
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

/// Spawn a filesystem watcher over the profile's base directories and
/// send [`RuntimeEvent::ChangeDetected`] for matching changes.
///
/// - `root` is the project root against which all glob patterns are
///   evaluated.
/// - Bursts of events within `options.debounce` become a single trigger.
/// - With `options.use_hash`, triggers whose watched content hash equals
///   the previous one are dropped.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profile: WatchProfile,
    options: WatchOptions,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // notify reports canonical paths; match them against a canonical root.
    let root = root.canonicalize().unwrap_or(root);

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("assetpipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("assetpipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut watched = 0;
    for base in profile.bases() {
        let dir = root.join(base);
        if !dir.is_dir() {
            warn!(dir = ?dir, "watch directory does not exist; skipping");
            continue;
        }
        watcher.watch(&dir, RecursiveMode::Recursive)?;
        info!("file watcher started on {:?}", dir);
        watched += 1;
    }
    if watched == 0 {
        bail!("none of the watch directories exist under {}", root.display());
    }

    let filter = EventFilter::new(root, profile, options, fs);
    tokio::spawn(run_event_loop(filter, event_rx, runtime_tx));

    Ok(WatcherHandle { _inner: watcher })
}

/// Consume raw notify events until either channel closes.
pub async fn run_event_loop(
    filter: EventFilter,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let mut gate = HashGate::new();
    if filter.options.use_hash {
        if let Err(e) = gate.prime(filter.fs.as_ref(), filter.root(), &filter.profile) {
            warn!("failed to hash watched files at startup: {e:#}");
        }
    }

    while let Some(event) = event_rx.recv().await {
        let mut paths = filter.relevant_paths(&event);
        if paths.is_empty() {
            continue;
        }
        debug!(?paths, "relevant change detected");

        // Fold the rest of the burst into this trigger.
        tokio::time::sleep(filter.options.debounce).await;
        while let Ok(extra) = event_rx.try_recv() {
            paths.extend(filter.relevant_paths(&extra));
        }
        paths.sort();
        paths.dedup();

        if filter.options.use_hash {
            match gate.should_trigger(filter.fs.as_ref(), filter.root(), &filter.profile) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => warn!("failed to hash watched files, triggering anyway: {e:#}"),
            }
        }

        if runtime_tx
            .send(RuntimeEvent::ChangeDetected { paths })
            .await
            .is_err()
        {
            debug!("runtime channel closed; stopping watcher loop");
            break;
        }
    }
    debug!("watcher event loop finished");
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};

    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn filter(fs: MockFileSystem, use_hash: bool) -> EventFilter {
        let profile = WatchProfile::new(&["sass/**/*.scss".to_string()], &[]).unwrap();
        EventFilter::new(
            "/p",
            profile,
            WatchOptions {
                debounce: Duration::from_millis(20),
                use_hash,
            },
            Arc::new(fs),
        )
    }

    fn modify(path: &str) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from(path))
    }

    #[test]
    fn access_and_foreign_paths_are_ignored() {
        let f = filter(MockFileSystem::new(), false);

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path("/p/sass/a.scss".into());
        assert!(f.relevant_paths(&access).is_empty());
        assert!(f.relevant_paths(&modify("/p/css/main.css")).is_empty());
        assert!(f.relevant_paths(&modify("/elsewhere/sass/a.scss")).is_empty());

        let create = Event::new(EventKind::Create(CreateKind::File)).add_path("/p/sass/b.scss".into());
        assert_eq!(f.relevant_paths(&create), vec![PathBuf::from("/p/sass/b.scss")]);
    }

    #[tokio::test]
    async fn burst_becomes_one_trigger() {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (rt_tx, mut rt_rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_event_loop(
            filter(MockFileSystem::new(), false),
            event_rx,
            rt_tx,
        ));

        event_tx.send(modify("/p/sass/a.scss")).unwrap();
        event_tx.send(modify("/p/sass/a.scss")).unwrap();
        event_tx.send(modify("/p/sass/parts/_b.scss")).unwrap();

        match rt_rx.recv().await {
            Some(RuntimeEvent::ChangeDetected { paths }) => assert_eq!(
                paths,
                vec![
                    PathBuf::from("/p/sass/a.scss"),
                    PathBuf::from("/p/sass/parts/_b.scss")
                ]
            ),
            other => panic!("expected ChangeDetected, got {other:?}"),
        }

        drop(event_tx);
        handle.await.unwrap();
        assert!(rt_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn hash_gate_drops_touch_without_edit() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/sass/a.scss", b"a { b: c }".to_vec());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (rt_tx, mut rt_rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_event_loop(filter(fs.clone(), true), event_rx, rt_tx));

        // Touch only: content identical to startup.
        event_tx.send(modify("/p/sass/a.scss")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rt_rx.try_recv().is_err());

        fs.add_file("/p/sass/a.scss", b"a { b: d }".to_vec());
        event_tx.send(modify("/p/sass/a.scss")).unwrap();
        assert!(matches!(
            rt_rx.recv().await,
            Some(RuntimeEvent::ChangeDetected { .. })
        ));

        drop(event_tx);
        handle.await.unwrap();
    }
}
