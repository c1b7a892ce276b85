//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `change_source/` - Change notifications (`notify` backend, manual source)
//! - `display/` - Output surfaces (terminal, in-memory recording)
//! - `control` - User control input (stdin, Ctrl+C)

pub mod change_source;
pub mod control;
pub mod display;

// Re-export for convenience
pub use change_source::{ManualChangeSource, NotifyChangeSource};
pub use control::{install_ctrlc_handler, read_controls, spawn_stdin_reader};
pub use display::{window_title, DisplayCall, RecordingDisplay, TerminalDisplay};
