//! Watch event types and options

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::value_objects::{CommandLine, RunId};

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory whose entries are watched
    pub root: PathBuf,
    /// Command rerun on every change
    pub command: CommandLine,
    /// Config
    pub config: Config,
}

impl WatchOptions {
    /// Create new watch options with default config
    pub fn new(root: PathBuf, command: CommandLine) -> Self {
        Self {
            root,
            command,
            config: Config::default(),
        }
    }

    /// Set config
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exited with status zero while current
    Succeeded,
    /// Failed to launch, or exited non-zero, while current
    Failed,
    /// A newer run started first; nothing was reported
    Superseded,
}

/// Lifecycle events emitted while watching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    WatchStarted { root: PathBuf, command: String },
    FileTracked { name: OsString },
    FileForgotten { name: OsString },
    RunStarted { id: RunId },
    RunFinished { id: RunId, outcome: RunOutcome },
    Shutdown,
}

/// Callback receiving `WatchEvent`s, possibly from several threads
pub type EventSink = Arc<dyn Fn(WatchEvent) + Send + Sync>;

/// A sink that drops every event
pub fn discard_events() -> EventSink {
    Arc::new(|_| {})
}
