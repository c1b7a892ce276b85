//! OS change notifications through the `notify` crate
//!
//! One `RecommendedWatcher` serves every subscription and events are fanned
//! out by `Routes`. Paths are watched non-recursively. A file whose directory
//! is already watched gets no OS watch of its own: the directory's watch
//! reports its changes, and a second watch would report each change twice.
//! A subdirectory is always watched, since the parent's watch never reports
//! what happens inside it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::domain::ports::{ChangeSource, Subscription, SubscriptionId};
use crate::domain::value_objects::{ChangeEvent, ChangeKind, EventKinds};
use crate::error::{WatchError, WatchResult};

use super::routes::Routes;

/// `ChangeSource` backed by inotify, FSEvents/kqueue or ReadDirectoryChanges
pub struct NotifyChangeSource {
    backend: Mutex<Backend>,
    routes: Arc<Mutex<Routes>>,
}

struct Backend {
    watcher: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl Backend {
    fn covers(&self, path: &Path) -> bool {
        self.watched.contains(path)
            || path
                .parent()
                .is_some_and(|parent| self.watched.contains(parent))
    }

    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        if self.covers(path) && !path.is_dir() {
            return Ok(());
        }
        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        self.watched.insert(path.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) {
        if !self.watched.remove(path) {
            return;
        }
        // The OS drops watches of deleted files on its own.
        if let Err(err) = self.watcher.unwatch(path) {
            debug!(path = %path.display(), %err, "unwatch failed");
        }
    }
}

impl NotifyChangeSource {
    /// Start the OS backend. Failure here is fatal to the watch.
    pub fn new() -> WatchResult<Self> {
        let routes = Arc::new(Mutex::new(Routes::default()));
        let dispatch_to = Arc::clone(&routes);

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in translate(&event) {
                        lock(&dispatch_to).dispatch(&change);
                    }
                }
                Err(err) => warn!(%err, "change backend error"),
            },
            notify::Config::default(),
        )?;

        Ok(Self {
            backend: Mutex::new(Backend {
                watcher,
                watched: HashSet::new(),
            }),
            routes,
        })
    }
}

impl ChangeSource for NotifyChangeSource {
    fn subscribe(&self, path: &Path, kinds: EventKinds) -> WatchResult<Subscription> {
        let (subscription, first) = lock(&self.routes).add(path, kinds);
        if first {
            // Never hold the routes lock here: the backend thread takes it to
            // dispatch while `watch` waits for that thread.
            let watched = lock(&self.backend).watch(path);
            if let Err(err) = watched {
                lock(&self.routes).remove(subscription.id);
                return Err(WatchError::Subscribe {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
        }
        Ok(subscription)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let released = lock(&self.routes).remove(id);
        if let Some(path) = released {
            lock(&self.backend).unwatch(&path);
        }
    }
}

/// Map a backend event to the change kinds watchrun cares about
fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            Some(ChangeKind::FileClosedAfterWrite)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ChangeKind::FileMovedIn),
        // inotify follows every paired move with `Both`, after the `To` it
        // already sent for the destination.
        #[cfg(not(target_os = "linux"))]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => Some(ChangeKind::FileMovedIn),
        // Backends without close notifications report the write itself.
        #[cfg(not(target_os = "linux"))]
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            Some(ChangeKind::FileClosedAfterWrite)
        }
        #[cfg(not(target_os = "linux"))]
        EventKind::Create(_) => Some(ChangeKind::FileMovedIn),
        _ => None,
    }
}

fn translate(event: &Event) -> Vec<ChangeEvent> {
    let Some(kind) = classify(&event.kind) else {
        return Vec::new();
    };
    match event.kind {
        // paths are [from, to]; only the destination moved in
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .last()
            .map(|to| ChangeEvent::new(kind, to.clone()))
            .into_iter()
            .collect(),
        _ => event
            .paths
            .iter()
            .map(|path| ChangeEvent::new(kind, path.clone()))
            .collect(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
