//! Watch Use Case implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::domain::ports::{ChangeSource, Display};
use crate::domain::value_objects::ControlEvent;
use crate::error::WatchResult;

use super::control::route_control_events;
use super::event::{EventSink, WatchEvent, WatchOptions};
use super::supervisor::RunSupervisor;
use super::tracker::DirectoryTracker;
use super::trigger::coalescer;

/// Watch Use Case
///
/// Wires the tracker, the coalescer, the supervisor and the control loop
/// together. This is the main entry point for the `watchrun` binary.
pub struct WatchUseCase {
    options: WatchOptions,
}

impl WatchUseCase {
    /// Create a new WatchUseCase
    pub fn new(options: WatchOptions) -> Self {
        Self { options }
    }

    /// Start watching (blocking)
    ///
    /// The command runs once right away and again after every change. This
    /// method returns when `running` is cleared, when a `Close` control event
    /// arrives, or with an error when the directory cannot be watched.
    pub fn start<S, D, F>(
        &self,
        source: Arc<S>,
        display: D,
        controls: Receiver<ControlEvent>,
        running: Arc<AtomicBool>,
        on_event: F,
    ) -> WatchResult<()>
    where
        S: ChangeSource + 'static,
        D: Display + 'static,
        F: Fn(WatchEvent) + Send + Sync + 'static,
    {
        let events: EventSink = Arc::new(on_event);
        let options = &self.options;

        events(WatchEvent::WatchStarted {
            root: options.root.clone(),
            command: options.command.to_string(),
        });
        info!(root = %options.root.display(), command = %options.command, "watching");

        let (trigger, waiter) = coalescer();
        trigger.signal();

        let supervisor = Arc::new(
            RunSupervisor::new(options.command.clone(), display, &options.config.run)
                .with_events(Arc::clone(&events)),
        );
        let supervisor_loop = {
            let supervisor = Arc::clone(&supervisor);
            let running = Arc::clone(&running);
            thread::spawn(move || supervisor.run_while(&waiter, &running))
        };

        let control_loop = route_control_events(controls, trigger.clone(), Arc::clone(&running));

        let mut tracker = DirectoryTracker::new(
            options.root.clone(),
            source,
            trigger,
            &options.config.watch,
        )
        .with_events(Arc::clone(&events));
        let result = tracker.run(&running);
        if let Err(err) = &result {
            warn!(%err, "watch stopped");
        }

        running.store(false, Ordering::SeqCst);
        if supervisor_loop.join().is_err() {
            warn!("supervisor loop panicked");
        }
        supervisor.shutdown();
        drop(tracker);
        if control_loop.join().is_err() {
            warn!("control loop panicked");
        }
        debug!("watch shut down");

        events(WatchEvent::Shutdown);
        result
    }
}
