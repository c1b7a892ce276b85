//! Directory tracking
//!
//! Keeps one change subscription per entry of the watched directory plus
//! one on the directory itself. The poll loop only discovers names; change
//! detection comes from the subscriptions, whose listeners turn every
//! relevant event into a trigger.

use std::collections::{BTreeSet, HashMap};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::WatchConfig;
use crate::domain::ports::{ChangeSource, Subscription, SubscriptionId};
use crate::domain::value_objects::EventKinds;
use crate::error::{WatchError, WatchResult};

use super::event::{discard_events, EventSink, WatchEvent};
use super::trigger::Trigger;

/// A directory entry under watch
#[derive(Debug)]
pub struct WatchedFile {
    // Held open for as long as the entry is tracked.
    _file: File,
    subscription: SubscriptionId,
}

/// What one poll cycle changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Newly subscribed names
    pub added: Vec<OsString>,
    /// Names that left the directory and were released
    pub removed: Vec<OsString>,
    /// Names that could not be opened or subscribed this cycle
    pub skipped: Vec<OsString>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.skipped.is_empty()
    }
}

/// Owns the set of watched files of one directory
pub struct DirectoryTracker<S: ChangeSource> {
    root: PathBuf,
    source: Arc<S>,
    trigger: Trigger,
    kinds: EventKinds,
    files: HashMap<OsString, WatchedFile>,
    dir_subscription: Option<SubscriptionId>,
    poll_interval: Duration,
    forget_removed: bool,
    events: EventSink,
}

impl<S: ChangeSource> DirectoryTracker<S> {
    pub fn new(root: impl Into<PathBuf>, source: Arc<S>, trigger: Trigger, config: &WatchConfig) -> Self {
        Self {
            root: root.into(),
            source,
            trigger,
            kinds: EventKinds::SAVES,
            files: HashMap::new(),
            dir_subscription: None,
            poll_interval: config.poll_interval(),
            forget_removed: config.forget_removed,
            events: discard_events(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Number of tracked entries, the directory itself excluded
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_tracked(&self, name: impl AsRef<OsStr>) -> bool {
        self.files.contains_key(name.as_ref())
    }

    /// Subscribe the directory itself. Failure is fatal to the watch.
    pub fn start(&mut self) -> WatchResult<()> {
        if self.dir_subscription.is_some() {
            return Ok(());
        }
        let subscription = self.source.subscribe(&self.root, self.kinds)?;
        self.dir_subscription = Some(subscription.id);
        spawn_listener(subscription, self.trigger.clone(), self.kinds, ".".into());
        Ok(())
    }

    /// One poll cycle: subscribe new names, release vanished ones.
    ///
    /// Only a failure to list the directory is an error.
    pub fn reconcile(&mut self) -> WatchResult<ReconcileReport> {
        let listing = self.list()?;
        let mut report = ReconcileReport::default();

        for name in &listing {
            if self.files.contains_key(name) {
                continue;
            }
            let path = self.root.join(name);
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(err) => {
                    trace!(path = %path.display(), %err, "cannot open, retrying next cycle");
                    report.skipped.push(name.clone());
                    continue;
                }
            };
            let subscription = match self.source.subscribe(&path, self.kinds) {
                Ok(subscription) => subscription,
                Err(err) => {
                    debug!(%err, "cannot subscribe, retrying next cycle");
                    report.skipped.push(name.clone());
                    continue;
                }
            };

            debug!(name = %name.to_string_lossy(), "tracking");
            let id = subscription.id;
            spawn_listener(subscription, self.trigger.clone(), self.kinds, name.clone());
            self.files.insert(
                name.clone(),
                WatchedFile {
                    _file: file,
                    subscription: id,
                },
            );
            (self.events)(WatchEvent::FileTracked { name: name.clone() });
            report.added.push(name.clone());
        }

        if self.forget_removed {
            let gone: Vec<OsString> = self
                .files
                .keys()
                .filter(|name| !listing.contains(*name))
                .cloned()
                .collect();
            for name in gone {
                if let Some(watched) = self.files.remove(&name) {
                    debug!(name = %name.to_string_lossy(), "no longer in directory, releasing");
                    self.source.unsubscribe(watched.subscription);
                    (self.events)(WatchEvent::FileForgotten { name: name.clone() });
                    report.removed.push(name);
                }
            }
        }

        report.added.sort();
        report.removed.sort();
        Ok(report)
    }

    /// Poll until `running` is cleared or the directory becomes unreadable.
    pub fn run(&mut self, running: &AtomicBool) -> WatchResult<()> {
        self.start()?;
        while running.load(Ordering::SeqCst) {
            self.reconcile()?;
            thread::sleep(self.poll_interval);
        }
        Ok(())
    }

    fn list(&self) -> WatchResult<BTreeSet<OsString>> {
        let read_dir_error = |source: std::io::Error| WatchError::ReadDir {
            path: self.root.clone(),
            source,
        };
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.root).map_err(read_dir_error)? {
            names.insert(entry.map_err(read_dir_error)?.file_name());
        }
        Ok(names)
    }
}

impl<S: ChangeSource> Drop for DirectoryTracker<S> {
    fn drop(&mut self) {
        for watched in self.files.values() {
            self.source.unsubscribe(watched.subscription);
        }
        if let Some(id) = self.dir_subscription.take() {
            self.source.unsubscribe(id);
        }
    }
}

/// Forward relevant events of one subscription to the trigger.
///
/// The thread ends when the subscription is released.
fn spawn_listener(subscription: Subscription, trigger: Trigger, kinds: EventKinds, label: OsString) {
    thread::spawn(move || {
        for event in subscription.events.iter() {
            if !kinds.contains(event.kind) {
                continue;
            }
            trace!(
                watch = %label.to_string_lossy(),
                kind = %event.kind,
                path = %event.path.display(),
                "change"
            );
            trigger.signal();
        }
    });
}
