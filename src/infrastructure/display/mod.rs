//! Display adapters

mod recording;
mod terminal;

pub use recording::{DisplayCall, RecordingDisplay};
pub use terminal::{window_title, TerminalDisplay};
