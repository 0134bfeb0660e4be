// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::event_handler::translate_notify_result;
use crate::watch::patterns::ExcludeFilter;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    root: PathBuf,
    _inner: RecommendedWatcher,
}

impl WatcherHandle {
    /// The canonical directory being watched.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Spawn a filesystem watcher on `root` that sends
/// `RuntimeEvent::ChangeDetected` for every changed path and
/// `RuntimeEvent::WatchError` for every watcher error.
///
/// - `recursive` also watches subdirectories.
/// - `exclude` drops changes whose root-relative path matches.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    recursive: bool,
    exclude: ExcludeFilter,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // No runtime left to log through.
                eprintln!("runwatch: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&root, mode)?;

    info!(root = %root.display(), recursive, "watching");

    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(res) = event_rx.recv().await {
            for event in translate_notify_result(&async_root, res, &exclude) {
                if runtime_tx.send(event).await.is_err() {
                    debug!("dispatcher gone; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        root,
        _inner: watcher,
    })
}
