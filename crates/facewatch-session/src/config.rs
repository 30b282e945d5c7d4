//! Pipeline configuration — TOML file with `FACEWATCH_*` environment overrides.

use facewatch_core::DEFAULT_TOLERANCE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "facewatch.toml";
/// Default directory of reference images.
pub const DEFAULT_REGISTRY_DIR: &str = "known";
/// Default directory for saved face crops.
pub const DEFAULT_EVIDENCE_DIR: &str = "detected_faces";
/// Default audit log path.
pub const DEFAULT_LOG_PATH: &str = "recognition_log.csv";
/// Default seconds between processed ticks.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
/// Allowed range for the tick interval, seconds.
pub const INTERVAL_RANGE_SECS: (f64, f64) = (0.1, 10.0);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("interval_secs {0} out of range [0.1, 10.0]")]
    IntervalOutOfRange(f64),
    #[error("tolerance {0} must be finite and non-negative")]
    InvalidTolerance(f32),
}

/// Watch pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Directory of reference images (filename stem = identity name).
    #[serde(default = "default_registry_dir")]
    pub registry_dir: PathBuf,
    /// Directory where evidence crops are written.
    #[serde(default = "default_evidence_dir")]
    pub evidence_dir: PathBuf,
    /// CSV audit log path.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Seconds to wait after each processed tick.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    /// Matching distance tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

fn default_registry_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REGISTRY_DIR)
}

fn default_evidence_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EVIDENCE_DIR)
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

fn default_interval_secs() -> f64 {
    DEFAULT_INTERVAL_SECS
}

fn default_tolerance() -> f32 {
    DEFAULT_TOLERANCE
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            registry_dir: default_registry_dir(),
            evidence_dir: default_evidence_dir(),
            log_path: default_log_path(),
            interval_secs: default_interval_secs(),
            tolerance: default_tolerance(),
        }
    }
}

impl WatchConfig {
    /// Load configuration: the file at `path` (or `facewatch.toml` when it
    /// exists, or built-in defaults), then `FACEWATCH_*` overrides, then
    /// validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `FACEWATCH_*` environment overrides on top of file values.
    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("FACEWATCH_REGISTRY_DIR") {
            self.registry_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("FACEWATCH_EVIDENCE_DIR") {
            self.evidence_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("FACEWATCH_LOG_PATH") {
            self.log_path = PathBuf::from(path);
        }
        self.interval_secs = env_f64("FACEWATCH_INTERVAL_SECS", self.interval_secs);
        self.tolerance = env_f32("FACEWATCH_TOLERANCE", self.tolerance);
    }

    /// Check the ranges the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = INTERVAL_RANGE_SECS;
        if !self.interval_secs.is_finite() || self.interval_secs < min || self.interval_secs > max {
            return Err(ConfigError::IntervalOutOfRange(self.interval_secs));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Tick interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
