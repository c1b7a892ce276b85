//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WatchError, WatchResult};

use super::env_validator::{levenshtein, parse_bool, EnvVarValidator};
use super::types::Config;

/// Project config file name, looked up in the watched directory
pub const PROJECT_CONFIG_FILE: &str = ".watchrun.toml";

/// Non-fatal configuration warning (an unknown key in a config file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, ". Did you mean '{}'?", suggestion)?;
        }
        Ok(())
    }
}

/// Result of resolving the configuration hierarchy.
///
/// Warnings are kept as text because logging is configured from the result
/// and cannot report them while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WatchResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WatchError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
pub fn load_or_default(project_root: &Path) -> LoadedConfig {
    let mut candidates = vec![project_root.join(PROJECT_CONFIG_FILE)];
    if let Some(user_config_dir) = dirs::config_dir() {
        candidates.push(user_config_dir.join("watchrun/config.toml"));
    }

    let mut loaded = LoadedConfig::default();
    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match load_with_warnings(&candidate) {
            Ok((config, warnings)) => {
                loaded.config = config;
                loaded.warnings.extend(warnings.iter().map(ToString::to_string));
                loaded.source = Some(candidate);
                break;
            }
            Err(err) => {
                loaded.warnings.push(format!("{err}. Ignoring this file."));
            }
        }
    }

    let (config, env_warnings) = with_env_overrides(loaded.config);
    loaded.config = config;
    loaded.warnings.extend(env_warnings);
    loaded
}

/// Apply environment variable overrides (WATCHRUN_* prefix)
pub fn with_env_overrides(config: Config) -> (Config, Vec<String>) {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

pub(crate) fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(val) = get_env("WATCHRUN_POLL_INTERVAL_MS") {
        config.watch.poll_interval_ms = EnvVarValidator::new("WATCHRUN_POLL_INTERVAL_MS", &[])
            .parse(
                &val,
                |s| s.trim().parse::<u64>().ok().filter(|ms| *ms > 0),
                config.watch.poll_interval_ms,
                &mut warnings,
            );
    }

    if let Some(val) = get_env("WATCHRUN_CHUNK_SIZE") {
        config.run.chunk_size = EnvVarValidator::new("WATCHRUN_CHUNK_SIZE", &[]).parse(
            &val,
            |s| s.trim().parse::<usize>().ok().filter(|n| *n > 0),
            config.run.chunk_size,
            &mut warnings,
        );
    }

    if let Some(val) = get_env("WATCHRUN_FORGET_REMOVED") {
        config.watch.forget_removed = EnvVarValidator::new(
            "WATCHRUN_FORGET_REMOVED",
            &["true", "false"],
        )
        .parse(&val, parse_bool, config.watch.forget_removed, &mut warnings);
    }

    if let Some(val) = get_env("WATCHRUN_LOG_LEVEL") {
        if !val.trim().is_empty() {
            config.log.level = val.trim().to_string();
        }
    }

    (config, warnings)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "poll_interval_ms",
        "forget_removed",
        "run",
        "chunk_size",
        "log",
        "level",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
