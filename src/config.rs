//! Runtime configuration.
//!
//! Values are layered: defaults, then an optional JSON file, then
//! `BLOCKFALL_*` environment variables. Command-line flags are applied on top
//! by the binary before [`GameConfig::validate`] runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gravity::DEFAULT_FALL_INTERVAL;

pub const ENV_FALL_INTERVAL: &str = "BLOCKFALL_FALL_INTERVAL";
pub const ENV_SEED: &str = "BLOCKFALL_SEED";

const DEFAULT_FRAME_RATE: u32 = 60;
const MAX_FRAME_RATE: u32 = 1000;
const DEFAULT_RELEASE_GRACE_MS: u32 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fall interval must be a positive number of seconds, got {0}")]
    InvalidFallInterval(f32),
    #[error("frame rate must be between 1 and 1000, got {0}")]
    InvalidFrameRate(u32),
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds between automatic one-row descents.
    pub fall_interval: f32,
    /// Piece RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Target frames per second of the terminal loop.
    pub frame_rate: u32,
    /// Where log output goes while the terminal UI is up. No logging
    /// without it.
    pub log_file: Option<PathBuf>,
    /// On terminals without key release events, how long a key stays held
    /// after its last press or repeat. Longer than the key repeat interval.
    pub release_grace_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fall_interval: DEFAULT_FALL_INTERVAL,
            seed: None,
            frame_rate: DEFAULT_FRAME_RATE,
            log_file: None,
            release_grace_ms: DEFAULT_RELEASE_GRACE_MS,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Overrides fields from `BLOCKFALL_*` environment variables that are set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env(ENV_FALL_INTERVAL) {
            self.fall_interval = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_FALL_INTERVAL,
                value: value.clone(),
            })?;
        }
        if let Some(value) = read_env(ENV_SEED) {
            self.seed = Some(value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_SEED,
                value: value.clone(),
            })?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fall_interval.is_finite() || self.fall_interval <= 0.0 {
            return Err(ConfigError::InvalidFallInterval(self.fall_interval));
        }
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
