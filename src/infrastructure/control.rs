//! User control sources: typed commands on stdin and Ctrl+C

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::domain::value_objects::ControlEvent;
use crate::error::WatchResult;

/// Forward every recognised line of `input` to `tx`.
///
/// Stops at end of input, on a read error, or once the receiver is gone.
/// Returns the number of events sent.
pub fn read_controls<R: BufRead>(input: R, tx: &Sender<ControlEvent>) -> usize {
    let mut sent = 0;
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                debug!(%err, "control input unreadable");
                break;
            }
        };
        let Some(event) = ControlEvent::parse_line(&line) else {
            debug!(line = %line.trim(), "ignoring unknown command");
            continue;
        };
        if tx.send(event).is_err() {
            break;
        }
        sent += 1;
    }
    sent
}

/// Read control lines from stdin on a background thread.
///
/// End of input only ends the reader; the watch keeps going.
pub fn spawn_stdin_reader(tx: Sender<ControlEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        read_controls(io::stdin().lock(), &tx);
        debug!("stdin closed");
    })
}

/// Turn Ctrl+C into `ControlEvent::Close`
pub fn install_ctrlc_handler(tx: Sender<ControlEvent>) -> WatchResult<()> {
    ctrlc::set_handler(move || {
        let _ = tx.send(ControlEvent::Close);
    })?;
    Ok(())
}
