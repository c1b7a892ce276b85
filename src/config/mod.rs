//! Configuration module for watchrun
//!
//! Configuration hierarchy:
//! 1. Environment variables (WATCHRUN_*)
//! 2. Project config (./.watchrun.toml)
//! 3. User config (~/.config/watchrun/config.toml)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{with_env_overrides, ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{Config, LogConfig, RunConfig, WatchConfig};
