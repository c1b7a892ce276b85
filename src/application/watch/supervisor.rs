//! Run supervisor
//!
//! Consumes triggers, launches the command with stdout and stderr merged into
//! one pipe, and streams that pipe to the display. Starting a run supersedes
//! the previous one: its process is killed (best effort) and the run-id gate
//! in `RunRegistry` drops anything it still prints.

use std::io::{self, PipeReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::domain::ports::Display;
use crate::domain::value_objects::{CommandLine, RunId, RunStatus};
use crate::error::WatchError;

use super::event::{discard_events, EventSink, RunOutcome, WatchEvent};
use super::run_state::{ProcessHandle, RunRegistry};
use super::trigger::TriggerWaiter;

/// Line written after the output of every finished run
pub const END_OF_RUN_MARKER: &str = "$\n";

/// How often a drained run checks whether its process has exited
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How often an idle supervisor loop checks the running flag
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A started run. Dropping it detaches the drain thread.
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Finished(RunOutcome),
    Draining(JoinHandle<RunOutcome>),
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Block until the run's output is drained and its process reaped
    pub fn join(self) -> RunOutcome {
        match self.state {
            HandleState::Finished(outcome) => outcome,
            HandleState::Draining(handle) => handle.join().unwrap_or(RunOutcome::Failed),
        }
    }
}

/// Starts, replaces and reports runs of one command
pub struct RunSupervisor<D> {
    command: CommandLine,
    registry: Arc<RunRegistry<D>>,
    chunk_size: usize,
    events: EventSink,
}

impl<D: Display + 'static> RunSupervisor<D> {
    pub fn new(command: CommandLine, display: D, config: &RunConfig) -> Self {
        Self {
            command,
            registry: Arc::new(RunRegistry::new(display)),
            chunk_size: config.chunk_size.max(1),
            events: discard_events(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    /// Id of the run whose output is currently shown
    pub fn current_run(&self) -> RunId {
        self.registry.current()
    }

    /// Start one run now, superseding whatever is running.
    pub fn start_run(&self) -> RunHandle {
        let (id, previous) = self.registry.begin_new_run();
        if let Some(previous) = previous {
            if let Err(err) = previous.kill() {
                debug!(pid = previous.pid(), %err, "superseded process already gone");
            }
        }
        debug!(%id, command = %self.command, "starting run");
        (self.events)(WatchEvent::RunStarted { id });

        let echo = format!("$ {}\n", self.command);
        self.registry.with_current(id, |display| {
            report(display.clear(), "clear");
            report(display.set_clean(false), "set_clean");
            report(display.set_status(RunStatus::Running), "set_status");
            report(display.append(echo.as_bytes()), "append");
        });

        let (child, reader) = match spawn_merged(&self.command) {
            Ok(spawned) => spawned,
            Err(source) => {
                let err = WatchError::Spawn {
                    command: self.command.to_string(),
                    source,
                };
                debug!(%id, %err, "launch failed");
                let outcome = self
                    .registry
                    .finish_run(id, |display| {
                        report(display.append(format!("{err}\n").as_bytes()), "append");
                        report(display.set_status(RunStatus::Failed), "set_status");
                        RunOutcome::Failed
                    })
                    .unwrap_or(RunOutcome::Superseded);
                (self.events)(WatchEvent::RunFinished { id, outcome });
                return RunHandle {
                    id,
                    state: HandleState::Finished(outcome),
                };
            }
        };

        let process = ProcessHandle::new(child);
        if !self.registry.attach_process(id, process.clone()) {
            // Shut down between launch and attach.
            let _ = process.kill();
        }

        let drain = Drain {
            id,
            registry: Arc::clone(&self.registry),
            command: self.command.to_string(),
            chunk_size: self.chunk_size,
            events: Arc::clone(&self.events),
        };
        let handle = thread::spawn(move || drain.run(reader, process));
        RunHandle {
            id,
            state: HandleState::Draining(handle),
        }
    }

    /// Start a run for every trigger until all producers are gone
    pub fn run_loop(&self, waiter: TriggerWaiter) {
        while waiter.wait() {
            self.start_run();
        }
        debug!("trigger producers gone, supervisor loop done");
    }

    /// Like `run_loop`, but also stops once `running` is cleared
    pub fn run_while(&self, waiter: &TriggerWaiter, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            if waiter.wait_timeout(IDLE_POLL_INTERVAL) && running.load(Ordering::SeqCst) {
                self.start_run();
            }
        }
        debug!("supervisor loop stopped");
    }

    /// Stop showing output and terminate the current process, if any
    pub fn shutdown(&self) {
        if let Some(process) = self.registry.retire() {
            if let Err(err) = process.kill() {
                debug!(pid = process.pid(), %err, "process already gone at shutdown");
            }
        }
    }
}

/// Output pump for one run
struct Drain<D> {
    id: RunId,
    registry: Arc<RunRegistry<D>>,
    command: String,
    chunk_size: usize,
    events: EventSink,
}

impl<D: Display> Drain<D> {
    fn run(self, mut reader: PipeReader, process: ProcessHandle) -> RunOutcome {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    self.registry
                        .with_current(self.id, |display| report(display.append(&buf[..n]), "append"));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(id = %self.id, %err, "output pipe read failed");
                    break;
                }
            }
        }
        drop(reader);

        let status = process.wait(EXIT_POLL_INTERVAL);
        let failure = match &status {
            Ok(status) if status.success() => None,
            Ok(status) => Some(status.to_string()),
            Err(err) => Some(err.to_string()),
        };

        let outcome = self
            .registry
            .finish_run(self.id, |display| {
                if let Some(reason) = &failure {
                    let line = format!("{}: {}\n", self.command, reason);
                    report(display.append(line.as_bytes()), "append");
                }
                report(display.append(END_OF_RUN_MARKER.as_bytes()), "append");
                report(display.set_view_to_top(), "set_view_to_top");
                report(display.set_clean(true), "set_clean");
                report(display.show(), "show");
                if failure.is_some() {
                    report(display.set_status(RunStatus::Failed), "set_status");
                    RunOutcome::Failed
                } else {
                    report(display.set_status(RunStatus::Succeeded), "set_status");
                    RunOutcome::Succeeded
                }
            })
            .unwrap_or(RunOutcome::Superseded);

        debug!(id = %self.id, ?outcome, "run finished");
        (self.events)(WatchEvent::RunFinished {
            id: self.id,
            outcome,
        });
        outcome
    }
}

/// Launch `command` with stdout and stderr sharing one pipe.
fn spawn_merged(command: &CommandLine) -> io::Result<(Child, PipeReader)> {
    let (reader, writer) = io::pipe()?;
    let stderr = writer.try_clone()?;
    // The Command (and with it our copies of the write end) is dropped at the
    // end of this statement, so the reader sees EOF when the child exits.
    let child = Command::new(command.program())
        .args(command.args())
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr)
        .spawn()?;
    Ok((child, reader))
}

fn report(result: io::Result<()>, action: &'static str) {
    if let Err(err) = result {
        warn!(action, %err, "display update failed");
    }
}
