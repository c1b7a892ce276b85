//! Subscription routing shared by the change source adapters
//!
//! An event for `dir/name` goes to the subscribers of `dir/name`. Subscribers
//! of `dir` only get it when nobody subscribed the path itself, so one change
//! is delivered once. A subscriber whose receiver is gone is dropped on the
//! next delivery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};

use crate::domain::ports::{Subscription, SubscriptionId};
use crate::domain::value_objects::{ChangeEvent, EventKinds};

#[derive(Debug)]
struct Route {
    id: SubscriptionId,
    kinds: EventKinds,
    tx: Sender<ChangeEvent>,
}

#[derive(Debug, Default)]
pub(crate) struct Routes {
    by_path: HashMap<PathBuf, Vec<Route>>,
    next_id: SubscriptionId,
}

impl Routes {
    /// Register a subscriber. The flag is `true` for the first subscriber of
    /// `path`, i.e. when the backend has to start watching it.
    pub(crate) fn add(&mut self, path: &Path, kinds: EventKinds) -> (Subscription, bool) {
        self.next_id += 1;
        let id = self.next_id;
        let (tx, rx) = mpsc::channel();

        let routes = self.by_path.entry(path.to_path_buf()).or_default();
        let first = routes.is_empty();
        routes.push(Route { id, kinds, tx });
        (Subscription { id, events: rx }, first)
    }

    /// Remove a subscriber. Returns its path when nobody else watches it.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> Option<PathBuf> {
        let path = self
            .by_path
            .iter()
            .find(|(_, routes)| routes.iter().any(|route| route.id == id))
            .map(|(path, _)| path.clone())?;

        let routes = self.by_path.get_mut(&path)?;
        routes.retain(|route| route.id != id);
        if routes.is_empty() {
            self.by_path.remove(&path);
            Some(path)
        } else {
            None
        }
    }

    /// Deliver `event` to the most specific interested subscribers; returns
    /// how many got it.
    pub(crate) fn dispatch(&mut self, event: &ChangeEvent) -> usize {
        let exact = self.deliver(&event.path, event);
        if exact > 0 {
            return exact;
        }
        match event.path.parent() {
            Some(parent) => self.deliver(parent, event),
            None => 0,
        }
    }

    fn deliver(&mut self, key: &Path, event: &ChangeEvent) -> usize {
        let Some(routes) = self.by_path.get_mut(key) else {
            return 0;
        };
        let mut delivered = 0;
        routes.retain(|route| {
            if !route.kinds.contains(event.kind) {
                return true;
            }
            match route.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        delivered
    }

    pub(crate) fn count_for(&self, path: &Path) -> usize {
        self.by_path.get(path).map_or(0, Vec::len)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_path.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ChangeKind;

    #[test]
    fn file_subscribers_take_precedence_over_the_directory() {
        let mut routes = Routes::default();
        let (file_sub, first) = routes.add(Path::new("/w/main.go"), EventKinds::SAVES);
        assert!(first);
        let (dir_sub, _) = routes.add(Path::new("/w"), EventKinds::SAVES);
        let (other_sub, _) = routes.add(Path::new("/elsewhere"), EventKinds::SAVES);

        let event = ChangeEvent::new(ChangeKind::FileClosedAfterWrite, "/w/main.go");
        assert_eq!(routes.dispatch(&event), 1);

        assert_eq!(file_sub.events.try_recv().unwrap(), event);
        assert!(dir_sub.events.try_recv().is_err());
        assert!(other_sub.events.try_recv().is_err());
    }

    #[test]
    fn directory_sees_untracked_children() {
        let mut routes = Routes::default();
        let (dir_sub, _) = routes.add(Path::new("/w"), EventKinds::SAVES);

        let event = ChangeEvent::new(ChangeKind::FileMovedIn, "/w/new.go");
        assert_eq!(routes.dispatch(&event), 1);
        assert_eq!(dir_sub.events.try_recv().unwrap(), event);
    }

    #[test]
    fn kinds_filter_delivery() {
        let mut routes = Routes::default();
        let only_moves = EventKinds::empty().with(ChangeKind::FileMovedIn);
        let (sub, _) = routes.add(Path::new("/w"), only_moves);

        let write = ChangeEvent::new(ChangeKind::FileClosedAfterWrite, "/w/a");
        assert_eq!(routes.dispatch(&write), 0);
        assert!(sub.events.try_recv().is_err());
    }

    #[test]
    fn remove_reports_last_subscriber_only() {
        let mut routes = Routes::default();
        let (a, _) = routes.add(Path::new("/w"), EventKinds::SAVES);
        let (b, first) = routes.add(Path::new("/w"), EventKinds::SAVES);
        assert!(!first);

        assert_eq!(routes.remove(a.id), None);
        assert_eq!(routes.remove(b.id), Some(PathBuf::from("/w")));
        assert_eq!(routes.remove(b.id), None);
        assert_eq!(routes.len(), 0);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut routes = Routes::default();
        let (sub, _) = routes.add(Path::new("/w/a"), EventKinds::SAVES);
        drop(sub);

        let event = ChangeEvent::new(ChangeKind::FileClosedAfterWrite, "/w/a");
        assert_eq!(routes.dispatch(&event), 0);
        assert_eq!(routes.count_for(Path::new("/w/a")), 0);
    }
}
