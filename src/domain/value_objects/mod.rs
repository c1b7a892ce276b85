//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod change_event;
mod command_line;
mod control_event;
mod run_id;
mod run_status;

pub use change_event::{ChangeEvent, ChangeKind, EventKinds};
pub use command_line::CommandLine;
pub use control_event::ControlEvent;
pub use run_id::RunId;
pub use run_status::RunStatus;
