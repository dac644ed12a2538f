//! Filesystem watch on the save folder.
//!
//! [`SaveWatcher`] registers a non-recursive `notify` watch and forwards
//! the path of every created or modified file into a bounded queue. The
//! registration lives exactly as long as the guard: dropping it releases
//! the watch and closes the queue, which ends the sync loop.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Paths worth forwarding from one notify event: create and modify only.
pub fn changed_paths(event: &Event) -> &[PathBuf] {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => event.paths.as_slice(),
        _ => &[],
    }
}

/// Scoped registration of the save folder watch.
pub struct SaveWatcher {
    _watcher: RecommendedWatcher,
    folder: PathBuf,
}

impl SaveWatcher {
    /// Start watching `folder`, returning the guard and the receiving end
    /// of a queue holding at most `capacity` pending paths.
    ///
    /// # Errors
    ///
    /// Returns the notify error if the watch cannot be registered.
    pub fn start(
        folder: &Path,
        capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<PathBuf>), notify::Error> {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for path in changed_paths(&event) {
                        // Blocks the notify thread while the queue is full.
                        if tx.blocking_send(path.clone()).is_err() {
                            debug!("Change queue closed, dropping notification");
                            return;
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Filesystem watch error"),
            }
        })?;
        watcher.watch(folder, RecursiveMode::NonRecursive)?;
        info!(folder = %folder.display(), "Save folder watch registered");

        Ok((
            Self {
                _watcher: watcher,
                folder: folder.to_path_buf(),
            },
            rx,
        ))
    }
}

impl Drop for SaveWatcher {
    fn drop(&mut self) {
        info!(folder = %self.folder.display(), "Save folder watch released");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};

    use super::*;

    fn event(kind: EventKind) -> Event {
        Event::new(kind).add_path(PathBuf::from("/saves/save_1.sav"))
    }

    #[test]
    fn create_and_modify_are_forwarded() {
        assert_eq!(changed_paths(&event(EventKind::Create(CreateKind::File))).len(), 1);
        assert_eq!(
            changed_paths(&event(EventKind::Modify(ModifyKind::Data(DataChange::Content)))).len(),
            1
        );
    }

    #[test]
    fn other_kinds_are_dropped() {
        assert!(changed_paths(&event(EventKind::Remove(RemoveKind::File))).is_empty());
        assert!(changed_paths(&event(EventKind::Access(AccessKind::Read))).is_empty());
    }

    #[tokio::test]
    async fn dropping_the_guard_closes_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let (watcher, mut rx) = SaveWatcher::start(dir.path(), 4).unwrap();
        drop(watcher);
        // Any events already queued drain first, then the queue reports closed.
        let closed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
