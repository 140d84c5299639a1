//! Configuration for the quiz binary.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! environment variables, then command-line flags (applied by `main`).
//!
//! ```toml
//! [round]
//! feedback_ms = 1500
//! tick_ms = 16
//!
//! [storage]
//! data_dir = "~/.local/share/tui-times"
//!
//! [logging]
//! file = "tui-times.log"
//! filter = "info"
//!
//! [player]
//! name = "ada"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::RoundConfig;
use crate::types::{FEEDBACK_MS, TICK_MS};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "tui-times.toml";

pub const ENV_DATA_DIR: &str = "TUI_TIMES_DATA_DIR";
pub const ENV_PLAYER: &str = "TUI_TIMES_PLAYER";

const MAX_FEEDBACK_MS: u32 = 10_000;
const MAX_TICK_MS: u32 = 1_000;
const MAX_PLAYER_NAME: usize = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub round: RoundSection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
    pub player: PlayerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSection {
    /// How long the verdict stays on screen.
    pub feedback_ms: u32,
    /// Game loop tick.
    pub tick_ms: u32,
}

impl Default for RoundSection {
    fn default() -> Self {
        Self {
            feedback_ms: FEEDBACK_MS,
            tick_ms: TICK_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding `scores.json` and `preferences.json`.
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tui-times"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directives; `TUI_TIMES_LOG` wins.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from("tui-times.log"),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSection {
    /// Scores are saved under this name; unset means guest play.
    pub name: Option<String>,
}

impl QuizConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: QuizConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path, else `tui-times.toml` if present, else defaults.
    /// Environment overrides are applied in every case.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `TUI_TIMES_DATA_DIR` and `TUI_TIMES_PLAYER`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(env::var(ENV_DATA_DIR).ok(), env::var(ENV_PLAYER).ok());
    }

    fn apply_overrides(&mut self, data_dir: Option<String>, player: Option<String>) {
        if let Some(dir) = data_dir.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = player {
            self.set_player(&name);
        }
    }

    /// Set or clear (blank name) the player.
    pub fn set_player(&mut self, name: &str) {
        let name = name.trim();
        self.player.name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.feedback_ms > MAX_FEEDBACK_MS {
            return Err(ConfigError::Invalid {
                field: "round.feedback_ms",
                message: format!("must be at most {MAX_FEEDBACK_MS}"),
            });
        }
        if self.round.tick_ms == 0 || self.round.tick_ms > MAX_TICK_MS {
            return Err(ConfigError::Invalid {
                field: "round.tick_ms",
                message: format!("must be between 1 and {MAX_TICK_MS}"),
            });
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage.data_dir",
                message: "must not be empty".to_string(),
            });
        }
        if let Some(name) = &self.player.name {
            if name.trim().is_empty() || name.chars().count() > MAX_PLAYER_NAME {
                return Err(ConfigError::Invalid {
                    field: "player.name",
                    message: format!("must be 1 to {MAX_PLAYER_NAME} characters"),
                });
            }
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.filter",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            feedback_ms: self.round.feedback_ms,
        }
    }

    pub fn scores_path(&self) -> PathBuf {
        self.storage.data_dir.join(crate::adapter::SCORES_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.storage.data_dir.join(crate::adapter::PREFERENCES_FILE)
    }
}
