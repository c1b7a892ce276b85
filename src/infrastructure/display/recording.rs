//! In-memory display that records every call

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::ports::Display;
use crate::domain::value_objects::RunStatus;

/// One call made on a `RecordingDisplay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Clear,
    Append(Vec<u8>),
    SetClean(bool),
    SetStatus(RunStatus),
    Show,
    SetViewToTop,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Mutex<Vec<DisplayCall>>,
    changed: Condvar,
}

/// Display that keeps its calls in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    shared: Arc<Shared>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.lock().clone()
    }

    /// Text appended since the last `clear`
    pub fn transcript(&self) -> String {
        let calls = self.lock();
        let start = calls
            .iter()
            .rposition(|call| *call == DisplayCall::Clear)
            .map_or(0, |i| i + 1);
        render(&calls[start..])
    }

    /// Everything ever appended, across clears
    pub fn full_transcript(&self) -> String {
        render(self.lock().as_slice())
    }

    /// Most recent status, if any was set
    pub fn status(&self) -> Option<RunStatus> {
        self.lock().iter().rev().find_map(|call| match call {
            DisplayCall::SetStatus(status) => Some(*status),
            _ => None,
        })
    }

    /// Block until `done` holds for the recorded calls or `timeout` passes.
    /// Returns whether `done` held.
    pub fn wait_until(&self, timeout: Duration, done: impl Fn(&[DisplayCall]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut calls = self.lock();
        loop {
            if done(calls.as_slice()) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            calls = self
                .shared
                .changed
                .wait_timeout(calls, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Wait until `count` runs have set a finished status
    pub fn wait_for_finished(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, |calls| {
            calls
                .iter()
                .filter(|call| matches!(call, DisplayCall::SetStatus(s) if s.is_finished()))
                .count()
                >= count
        })
    }

    fn record(&self, call: DisplayCall) {
        self.lock().push(call);
        self.shared.changed.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DisplayCall>> {
        self.shared
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn render(calls: &[DisplayCall]) -> String {
    let bytes: Vec<u8> = calls
        .iter()
        .filter_map(|call| match call {
            DisplayCall::Append(bytes) => Some(bytes.as_slice()),
            _ => None,
        })
        .flatten()
        .copied()
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Display for RecordingDisplay {
    fn clear(&mut self) -> std::io::Result<()> {
        self.record(DisplayCall::Clear);
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.record(DisplayCall::Append(bytes.to_vec()));
        Ok(())
    }

    fn set_clean(&mut self, clean: bool) -> std::io::Result<()> {
        self.record(DisplayCall::SetClean(clean));
        Ok(())
    }

    fn set_status(&mut self, status: RunStatus) -> std::io::Result<()> {
        self.record(DisplayCall::SetStatus(status));
        Ok(())
    }

    fn show(&mut self) -> std::io::Result<()> {
        self.record(DisplayCall::Show);
        Ok(())
    }

    fn set_view_to_top(&mut self) -> std::io::Result<()> {
        self.record(DisplayCall::SetViewToTop);
        Ok(())
    }
}
