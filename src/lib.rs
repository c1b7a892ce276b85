//! watchrun - rerun a command every time a file is saved
//!
//! watchrun watches the entries of one directory, merges bursts of change
//! notifications into single rerun requests, and runs a command with its
//! output streamed to the terminal. A newer run always replaces the one in
//! flight, and output of a replaced run is never shown.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{WatchEvent, WatchOptions, WatchUseCase};
pub use config::Config;
pub use domain::ports::{ChangeSource, Display};
pub use domain::value_objects::{ChangeEvent, ChangeKind, CommandLine, ControlEvent, RunId, RunStatus};
pub use error::{WatchError, WatchResult};
