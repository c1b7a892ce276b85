//! Run status - the label shown for the current run

use std::fmt;

/// Observable state of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Command launched, output streaming
    Running,
    /// Command exited with status zero
    Succeeded,
    /// Command failed to launch or exited non-zero
    Failed,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Succeeded => "ok",
            RunStatus::Failed => "failed",
        }
    }

    /// Returns true once the run has finished, either way
    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
