// Configuration module
// Optional settings loaded from `~/.config/hsh/config.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hash::hash::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
use crate::hash::{Algorithm, HashRegistry, HashUtilityError};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "HSH_CONFIG";

/// Settings read from the config file; every key is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Algorithm used when a command does not name one
    pub default_algorithm: String,
    /// Hash batch files on all cores
    pub parallel: bool,
    /// Read buffer size in bytes
    pub buffer_size: usize,
    /// Colorize verification verdicts on a terminal
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_algorithm: "sha256".to_string(),
            parallel: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            color: true,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(data: &str, path: Option<&Path>) -> Result<Self, HashUtilityError> {
        let config: Config = toml::from_str(data).map_err(|e| HashUtilityError::ConfigError {
            path: path.map(Path::to_path_buf),
            reason: e.message().to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, HashUtilityError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path).map_err(|e| HashUtilityError::ConfigError {
            path: Some(path.to_path_buf()),
            reason: format!("cannot read file: {}", e),
        })?;
        let config = Self::from_toml(&data, Some(path))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `$HSH_CONFIG` or the platform config directory
    pub fn load() -> Result<Self, HashUtilityError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// The configured default algorithm
    pub fn algorithm(&self) -> Result<Algorithm, HashUtilityError> {
        HashRegistry::lookup(&self.default_algorithm)
    }

    fn validate(&self, path: Option<&Path>) -> Result<(), HashUtilityError> {
        let invalid = |reason: String| HashUtilityError::ConfigError {
            path: path.map(Path::to_path_buf),
            reason,
        };

        if self.buffer_size == 0 {
            return Err(invalid("buffer_size must be greater than zero".to_string()));
        }
        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(invalid(format!(
                "buffer_size must be at most {} bytes",
                MAX_BUFFER_SIZE
            )));
        }
        if !HashRegistry::is_algorithm(&self.default_algorithm) {
            return Err(invalid(format!(
                "unknown default_algorithm '{}'",
                self.default_algorithm
            )));
        }
        Ok(())
    }
}

/// Location of the config file, if one can be determined
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("hsh").join("config.toml"))
}
