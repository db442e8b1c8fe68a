//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Decide where the data file, its fallback copy and the logs live.
//! - Pick the completed-list selection mechanism.
//!
//! # Invariants
//! - Every resolved directory is absolute.
//! - Resolution never touches the file system beyond `current_dir`/`current_exe`.

use crate::controller::selection::SelectionMode;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_FILE_NAME: &str = "todoData.json";
pub const ENV_DATA_DIR: &str = "DAYLIST_DATA_DIR";
pub const ENV_FALLBACK_DIR: &str = "DAYLIST_FALLBACK_DIR";
pub const ENV_SELECTION_MODE: &str = "DAYLIST_SELECTION_MODE";
pub const ENV_LOG_LEVEL: &str = "DAYLIST_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAYLIST_LOG_DIR";

const APP_DIR_NAME: &str = "daylist";
const HOME_APP_DIR_NAME: &str = ".daylist";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDir { key: &'static str, value: String },
    InvalidSelectionMode(String),
    InvalidLogLevel(String),
    /// Neither the environment nor the platform yields a data directory.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDir { key, value } => {
                write!(f, "{key} must be an absolute path, got `{value}`")
            }
            Self::InvalidSelectionMode(value) => write!(
                f,
                "unsupported selection mode `{value}`; expected checkbox|tap-toggle"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::NoDataDir => write!(f, "could not determine a data directory"),
        }
    }
}

impl Error for ConfigError {}

/// Primary and fallback data file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub primary: PathBuf,
    pub fallback: Option<PathBuf>,
}

impl StorePaths {
    /// Places the data file inside `data_dir`, with an optional fallback dir.
    pub fn in_dirs(data_dir: impl AsRef<Path>, fallback_dir: Option<&Path>) -> Self {
        Self {
            primary: data_dir.as_ref().join(DATA_FILE_NAME),
            fallback: fallback_dir.map(|dir| dir.join(DATA_FILE_NAME)),
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub fallback_dir: Option<PathBuf>,
    pub selection_mode: SelectionMode,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match get(ENV_DATA_DIR) {
            Some(raw) => absolute_dir(ENV_DATA_DIR, raw)?,
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };
        let fallback_dir = match get(ENV_FALLBACK_DIR) {
            Some(raw) => Some(absolute_dir(ENV_FALLBACK_DIR, raw)?),
            None => default_fallback_dir(),
        };
        let selection_mode = match get(ENV_SELECTION_MODE) {
            Some(raw) => raw
                .parse::<SelectionMode>()
                .map_err(|_| ConfigError::InvalidSelectionMode(raw))?,
            None => SelectionMode::default(),
        };
        let log_level = match get(ENV_LOG_LEVEL) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log_dir = match get(ENV_LOG_DIR) {
            Some(raw) => absolute_dir(ENV_LOG_DIR, raw)?,
            None => fallback_dir
                .as_deref()
                .unwrap_or(data_dir.as_path())
                .join(LOG_DIR_NAME),
        };

        Ok(Self {
            data_dir,
            fallback_dir,
            selection_mode,
            log_level,
            log_dir,
        })
    }

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::in_dirs(&self.data_dir, self.fallback_dir.as_deref())
    }
}

fn absolute_dir(key: &'static str, raw: String) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(&raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(ConfigError::RelativeDir { key, value: raw })
    }
}

/// Development keeps the data file next to the sources (working directory);
/// packaged builds keep it beside the executable.
fn default_data_dir() -> Option<PathBuf> {
    if cfg!(debug_assertions) {
        std::env::current_dir().ok()
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    }
}

fn default_fallback_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .or_else(|| dirs::home_dir().map(|dir| dir.join(HOME_APP_DIR_NAME)))
}
