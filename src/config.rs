//! Pathway configuration.
//!
//! Loaded from `~/.pathway/config.toml`. Every key is optional; a missing
//! file means defaults.
//!
//! ```toml
//! default-student = "ada"
//! database = "/var/lib/pathway/pathway.sqlite"
//! log-level = "info"
//!
//! [thresholds]
//! advance = 0.85
//! reinforce = 0.6
//! backtrack = 0.4
//! mastery-score = 0.8
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::engine::{Engine, Thresholds};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid thresholds in {path}: {reason}")]
    Thresholds { path: PathBuf, reason: String },
}

/// Pathway configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Student to act as when `--student` and `PATHWAY_STUDENT` are absent.
    pub default_student: Option<String>,

    /// Database path. Defaults to `~/.pathway/pathway.sqlite`.
    pub database: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,

    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Config {
    /// Load config from `~/.pathway/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config
            .thresholds
            .validate()
            .map_err(|reason| ConfigError::Thresholds {
                path: path.to_path_buf(),
                reason,
            })?;

        Ok(config)
    }

    /// The config file path: `~/.pathway/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pathway").join("config.toml"))
    }

    /// The engine configured with these thresholds.
    #[must_use]
    pub fn engine(&self) -> Engine {
        Engine::new(self.thresholds)
    }
}
