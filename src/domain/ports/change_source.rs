//! ChangeSource port - abstraction over filesystem change notification
//!
//! The watch loop never talks to inotify/FSEvents directly. It asks a
//! `ChangeSource` for a subscription on a path and receives `ChangeEvent`s on
//! a channel. A directory subscription also hears about its children, except
//! children that have a subscription of their own.

use std::path::Path;
use std::sync::mpsc::Receiver;

use crate::domain::value_objects::{ChangeEvent, EventKinds};
use crate::error::WatchResult;

/// Opaque handle identifying one subscription
pub type SubscriptionId = u64;

/// An active subscription: its handle and the channel events arrive on.
///
/// The channel disconnects once the subscription is released.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: Receiver<ChangeEvent>,
}

/// Abstract change notification backend
///
/// Implementations:
/// - `NotifyChangeSource` - OS backend through the `notify` crate
/// - `ManualChangeSource` - events injected by hand, for tests
pub trait ChangeSource: Send + Sync {
    /// Start delivering events of `kinds` for `path`, and for its otherwise
    /// unsubscribed children when `path` is a directory.
    fn subscribe(&self, path: &Path, kinds: EventKinds) -> WatchResult<Subscription>;

    /// Stop delivering events for a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
