//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (value objects, ports)
//! - Does NOT talk to the OS directly (that is Infrastructure)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `WatchUseCase` - Reruns a command on every save in a directory

pub mod watch;

pub use watch::{
    coalescer, DirectoryTracker, RunOutcome, RunSupervisor, Trigger, TriggerWaiter, WatchEvent,
    WatchOptions, WatchUseCase,
};
