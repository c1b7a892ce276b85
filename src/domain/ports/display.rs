//! Display port - where run output goes
//!
//! The supervisor treats the display as an append-only transcript of the
//! current run plus a few window-management verbs. Errors are returned so the
//! caller can log them; a failing display never stops the watch loop.

use std::io;

use crate::domain::value_objects::RunStatus;

/// Abstract output surface for the watched command
///
/// Implementations:
/// - `TerminalDisplay` - writes to a terminal or plain stdout
/// - `RecordingDisplay` - keeps every call in memory, for tests
pub trait Display: Send {
    /// Drop everything shown so far
    fn clear(&mut self) -> io::Result<()>;

    /// Append raw output bytes
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Mark the contents as settled (`true`) or still changing (`false`)
    fn set_clean(&mut self, clean: bool) -> io::Result<()>;

    /// Show the state of the current run
    fn set_status(&mut self, status: RunStatus) -> io::Result<()>;

    /// Bring the display to the user's attention
    fn show(&mut self) -> io::Result<()>;

    /// Scroll back to the first line of output
    fn set_view_to_top(&mut self) -> io::Result<()>;
}
