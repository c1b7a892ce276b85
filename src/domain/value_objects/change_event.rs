//! Change event value objects - what a change source reports
//!
//! Only two kinds matter to watchrun: a file that was closed after being
//! written, and a file that was moved into a watched directory (editors that
//! save through a temporary file and rename it over the original).

use std::fmt;
use std::path::PathBuf;

/// Kind of filesystem change a subscription can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A file opened for writing was closed
    FileClosedAfterWrite,
    /// A file was renamed or moved into the watched location
    FileMovedIn,
}

impl ChangeKind {
    fn bit(self) -> u8 {
        match self {
            ChangeKind::FileClosedAfterWrite => 0b01,
            ChangeKind::FileMovedIn => 0b10,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::FileClosedAfterWrite => write!(f, "close-write"),
            ChangeKind::FileMovedIn => write!(f, "moved-in"),
        }
    }
}

/// A set of change kinds a subscriber is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventKinds(u8);

impl EventKinds {
    /// The kinds an editor save produces
    pub const SAVES: EventKinds = EventKinds(0b11);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(self, kind: ChangeKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn contains(&self, kind: ChangeKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<ChangeKind> for EventKinds {
    fn from_iter<I: IntoIterator<Item = ChangeKind>>(iter: I) -> Self {
        iter.into_iter().fold(EventKinds::empty(), EventKinds::with)
    }
}

/// A single change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}
