//! Watch Use Case
//!
//! Reruns a command every time a file of the watched directory is saved.
//! It orchestrates:
//! - Directory tracking (one change subscription per entry)
//! - Trigger coalescing (bursts of changes become one pending run)
//! - Run supervision (newest run wins, stale output is never shown)
//! - User control (rerun, close)
//!
//! ## Architecture
//!
//! - `DirectoryTracker` - Discovers entries and subscribes them
//! - `coalescer` - Single-slot `Trigger`/`TriggerWaiter` pair
//! - `RunSupervisor` - Launches, replaces and reports runs
//! - `RunRegistry` - Run-id gate shared by the supervisor and its drain threads
//! - `WatchUseCase` - Main orchestrator
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(WatchOptions::new(root, command));
//! use_case.start(source, display, controls, running, |event| { ... })?;
//! ```

mod control;
mod event;
mod run_state;
mod supervisor;
mod tracker;
mod trigger;
mod use_case;


pub use control::route_control_events;
pub use event::{discard_events, EventSink, RunOutcome, WatchEvent, WatchOptions};
pub use run_state::{ProcessHandle, RunRegistry};
pub use supervisor::{RunHandle, RunSupervisor, END_OF_RUN_MARKER};
pub use tracker::{DirectoryTracker, ReconcileReport, WatchedFile};
pub use trigger::{coalescer, Trigger, TriggerWaiter};
pub use use_case::WatchUseCase;
