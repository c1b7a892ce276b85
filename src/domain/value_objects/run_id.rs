//! Run identifier - orders runs of the watched command

use std::fmt;

/// Identifier of one run of the watched command.
///
/// Ids strictly increase; a larger id always belongs to a later run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(u64);

impl RunId {
    /// The id in effect before any run has started
    pub const NONE: RunId = RunId(0);

    pub fn next(self) -> RunId {
        RunId(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
