//! Hand-driven change source
//!
//! Events are injected with `emit`, which makes watch behaviour testable
//! without depending on the timing of a real OS backend.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{ChangeSource, Subscription, SubscriptionId};
use crate::domain::value_objects::{ChangeEvent, EventKinds};
use crate::error::{WatchError, WatchResult};

use super::routes::Routes;

#[derive(Debug, Default)]
struct ManualState {
    routes: Routes,
    failing: HashSet<PathBuf>,
}

/// `ChangeSource` whose events are injected by hand
#[derive(Debug, Default)]
pub struct ManualChangeSource {
    state: Mutex<ManualState>,
}

impl ManualChangeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event as the OS would; returns how many subscribers got it
    pub fn emit(&self, event: ChangeEvent) -> usize {
        self.lock().routes.dispatch(&event)
    }

    /// Make every later `subscribe` of `path` fail
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.lock().failing.insert(path.into());
    }

    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    pub fn subscription_count(&self, path: &Path) -> usize {
        self.lock().routes.count_for(path)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.lock().routes.len()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChangeSource for ManualChangeSource {
    fn subscribe(&self, path: &Path, kinds: EventKinds) -> WatchResult<Subscription> {
        let mut state = self.lock();
        if state.failing.contains(path) {
            return Err(WatchError::Subscribe {
                path: path.to_path_buf(),
                message: "subscription refused".to_string(),
            });
        }
        Ok(state.routes.add(path, kinds).0)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().routes.remove(id);
    }
}
