//! Shared run state
//!
//! One lock guards the current `RunId`, the process of the current run and
//! the display. Every display write goes through `with_current`, so a write
//! for a run that is no longer current cannot happen: the currency check and
//! the write share one critical section.

use std::io;
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::domain::ports::Display;
use crate::domain::value_objects::RunId;

/// Shared handle to a launched process.
///
/// Kill and reap may be called from different threads; each takes the
/// handle's own lock only for the duration of one non-blocking syscall.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pid: u32,
    child: Arc<Mutex<Child>>,
}

impl ProcessHandle {
    pub fn new(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Arc::new(Mutex::new(child)),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Ask the process to terminate immediately. Advisory; it may be gone.
    pub fn kill(&self) -> io::Result<()> {
        lock(&self.child).kill()
    }

    pub fn try_wait(&self) -> io::Result<Option<ExitStatus>> {
        lock(&self.child).try_wait()
    }

    /// Reap the process, polling every `interval` so `kill` is never blocked
    /// behind a waiting thread.
    pub fn wait(&self, interval: Duration) -> io::Result<ExitStatus> {
        loop {
            if let Some(status) = self.try_wait()? {
                return Ok(status);
            }
            thread::sleep(interval);
        }
    }
}

struct RunSlot<D> {
    current: RunId,
    process: Option<ProcessHandle>,
    display: D,
}

/// The single authority on which run is current
pub struct RunRegistry<D> {
    slot: Mutex<RunSlot<D>>,
}

impl<D: Display> RunRegistry<D> {
    pub fn new(display: D) -> Self {
        Self {
            slot: Mutex::new(RunSlot {
                current: RunId::NONE,
                process: None,
                display,
            }),
        }
    }

    /// Make a new run current.
    ///
    /// Returns the new id and the process of the run it replaces, which the
    /// caller should terminate.
    pub fn begin_new_run(&self) -> (RunId, Option<ProcessHandle>) {
        let mut slot = lock(&self.slot);
        slot.current = slot.current.next();
        (slot.current, slot.process.take())
    }

    pub fn is_current(&self, id: RunId) -> bool {
        lock(&self.slot).current == id
    }

    pub fn current(&self) -> RunId {
        lock(&self.slot).current
    }

    /// Run `f` against the display if `id` is still current.
    pub fn with_current<R>(&self, id: RunId, f: impl FnOnce(&mut D) -> R) -> Option<R> {
        let mut slot = lock(&self.slot);
        if slot.current != id {
            return None;
        }
        Some(f(&mut slot.display))
    }

    /// Record the process of run `id`.
    ///
    /// Returns `false` when the run was superseded in the meantime; the
    /// caller then owns the stray process.
    pub fn attach_process(&self, id: RunId, process: ProcessHandle) -> bool {
        let mut slot = lock(&self.slot);
        if slot.current != id {
            return false;
        }
        slot.process = Some(process);
        true
    }

    /// Like `with_current`, and forgets the process of the finished run.
    pub fn finish_run<R>(&self, id: RunId, f: impl FnOnce(&mut D) -> R) -> Option<R> {
        let mut slot = lock(&self.slot);
        if slot.current != id {
            return None;
        }
        slot.process = None;
        Some(f(&mut slot.display))
    }

    /// Retire the current run without starting another one.
    ///
    /// Bumps the id so nothing more is shown and hands back the process to
    /// terminate.
    pub fn retire(&self) -> Option<ProcessHandle> {
        let mut slot = lock(&self.slot);
        slot.current = slot.current.next();
        slot.process.take()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::display::RecordingDisplay;

    #[test]
    fn ids_strictly_increase_and_only_latest_is_current() {
        let registry = RunRegistry::new(RecordingDisplay::new());

        let (first, previous) = registry.begin_new_run();
        assert!(previous.is_none());
        let (second, _) = registry.begin_new_run();

        assert!(second > first);
        assert!(!registry.is_current(first));
        assert!(registry.is_current(second));
        assert_eq!(registry.current(), second);
    }

    #[test]
    fn stale_run_cannot_write() {
        let display = RecordingDisplay::new();
        let registry = RunRegistry::new(display.clone());

        let (stale, _) = registry.begin_new_run();
        let (fresh, _) = registry.begin_new_run();

        assert!(registry
            .with_current(stale, |d| d.append(b"old"))
            .is_none());
        assert!(registry
            .with_current(fresh, |d| d.append(b"new"))
            .is_some());
        assert_eq!(display.transcript(), "new");
    }

    #[test]
    fn retire_makes_no_run_current() {
        let registry = RunRegistry::new(RecordingDisplay::new());
        let (id, _) = registry.begin_new_run();

        assert!(registry.retire().is_none());
        assert!(!registry.is_current(id));
        assert!(registry.finish_run(id, |_| ()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn superseding_hands_back_previous_process() {
        use std::process::{Command, Stdio};

        let registry = RunRegistry::new(RecordingDisplay::new());
        let (id, _) = registry.begin_new_run();
        let child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let handle = ProcessHandle::new(child);
        assert!(registry.attach_process(id, handle.clone()));

        let (_, previous) = registry.begin_new_run();
        let previous = previous.expect("previous process handed back");
        assert_eq!(previous.pid(), handle.pid());

        previous.kill().unwrap();
        let status = previous.wait(Duration::from_millis(5)).unwrap();
        assert!(!status.success());
    }

    #[cfg(unix)]
    #[test]
    fn attach_to_superseded_run_is_refused() {
        use std::process::Command;

        let registry = RunRegistry::new(RecordingDisplay::new());
        let (stale, _) = registry.begin_new_run();
        registry.begin_new_run();

        let handle = ProcessHandle::new(Command::new("true").spawn().unwrap());
        assert!(!registry.attach_process(stale, handle.clone()));
        handle.wait(Duration::from_millis(5)).unwrap();
    }
}
