//! Control loop: user requests become triggers or a shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::domain::value_objects::ControlEvent;

use super::trigger::Trigger;

/// How often an idle control loop checks the running flag
const CONTROL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Route control events until `Close` arrives or `running` is cleared.
///
/// `Rerun` signals `trigger`; `Close` clears `running`.
pub fn route_control_events(
    controls: Receiver<ControlEvent>,
    trigger: Trigger,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::SeqCst) {
            match controls.recv_timeout(CONTROL_POLL_INTERVAL) {
                Ok(ControlEvent::Rerun) => {
                    debug!("rerun requested");
                    trigger.signal();
                }
                Ok(ControlEvent::Close) => {
                    debug!("close requested");
                    running.store(false, Ordering::SeqCst);
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Nobody can ask for anything any more; keep watching.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
