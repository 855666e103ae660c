//! Arrival watching
//!
//! The notify callback only forwards paths into a channel; a single consumer
//! drains it and runs one ingestion at a time, in arrival order.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use log::{debug, error, info, warn};
use notify::event::{CreateKind, EventKind, ModifyKind, RenameMode};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use crate::alert::Notifier;
use crate::error::WatchSetupError;
use crate::ingest::{IngestHandler, READY_TEXT};

/// Make sure the watched directory exists
///
/// Returns `true` when the directory had to be created, in which case the
/// virtual printer still needs to be pointed at it.
pub fn prepare_watch_dir(dir: &Path) -> Result<bool, WatchSetupError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(WatchSetupError::NotADirectory(dir.to_path_buf()));
        }
        return Ok(false);
    }

    std::fs::create_dir_all(dir).map_err(|source| WatchSetupError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Paths of files that appeared in the folder according to a watcher event
///
/// Files moved in from elsewhere count as arrivals, so writers that save to a
/// temporary name and rename into place are picked up. A rename source may be
/// reported too; the consumer skips paths that no longer exist.
pub fn created_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => event.paths.clone(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Any)) => {
            event.paths.clone()
        }
        // Paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.get(1).cloned().into_iter().collect()
        }
        _ => Vec::new(),
    }
}

/// Subscription to file creations in one directory
pub struct ArrivalWatcher {
    dir: PathBuf,
    // Dropping the watcher ends the subscription
    _watcher: RecommendedWatcher,
    arrivals: UnboundedReceiver<PathBuf>,
}

impl ArrivalWatcher {
    /// Start watching `dir` (non-recursively)
    pub fn subscribe(dir: &Path) -> Result<Self, WatchSetupError> {
        let (tx, arrivals) = unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for path in created_paths(&event) {
                        // Receiver gone means we are shutting down
                        let _ = tx.send(path);
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            }
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            _watcher: watcher,
            arrivals,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Process arrivals until `shutdown` resolves
    ///
    /// Shutdown is only observed between ingestions, so a file being
    /// processed is always finished first. Shutdown takes priority over the
    /// queue: arrivals still waiting when it resolves are abandoned and stay
    /// in the watched folder.
    pub async fn run_until<F>(
        mut self,
        handler: Arc<IngestHandler>,
        notifier: &dyn Notifier,
        shutdown: F,
    ) where
        F: Future<Output = ()>,
    {
        info!("{}", READY_TEXT);
        tokio::pin!(shutdown);

        loop {
            let path = tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Closing watcher on '{}', please wait...", self.dir.display());
                    break;
                }
                arrival = self.arrivals.recv() => match arrival {
                    Some(path) => path,
                    None => {
                        warn!("Watcher on '{}' stopped delivering events", self.dir.display());
                        break;
                    }
                },
            };

            if !path.is_file() {
                debug!("Ignoring event for '{}': not a file (already handled?)", path.display());
                continue;
            }

            let task_handler = Arc::clone(&handler);
            let task_path = path.clone();
            let result =
                tokio::task::spawn_blocking(move || task_handler.handle(&task_path)).await;

            match result {
                Ok(report) => debug!("Ingestion finished: {:?}", report),
                Err(e) => {
                    error!("Ingestion of '{}' aborted unexpectedly: {}", path.display(), e);
                    notifier.notify(
                        &format!("An error occurred while processing: {}", path.display()),
                        false,
                    );
                }
            }
        }

        info!("Done");
    }
}
