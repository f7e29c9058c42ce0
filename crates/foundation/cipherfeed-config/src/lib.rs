//! # CipherFeed Config
//!
//! YAML configuration with environment overrides.
//!
//! Lookup order:
//! 1. explicit `--config <path>`
//! 2. `<config_dir>/cipherfeed/config.yaml`
//! 3. built-in defaults
//!
//! Then `CIPHERFEED_STORAGE` and `CIPHERFEED_LOG` override the loaded values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the post store path
pub const ENV_STORAGE: &str = "CIPHERFEED_STORAGE";
/// Overrides the default log filter
pub const ENV_LOG: &str = "CIPHERFEED_LOG";

/// File name of the post store, kept from the browser storage key
pub const POSTS_FILE: &str = "cipherfeed_posts_v1.json";

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub render: RenderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Post store file. Defaults to the platform data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Preview surface width in pixels
    pub width: u32,
    /// Preview surface height in pixels
    pub height: u32,
    /// Animation cadence
    pub fps: u32,
    /// Post card surface width
    pub card_width: u32,
    /// Post card surface height
    pub card_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            fps: 60,
            card_width: 600,
            card_height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location, then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_path(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_STORAGE).filter(|v| !v.is_empty()) {
            self.storage.path = Some(PathBuf::from(path));
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.log.filter = filter;
        }
    }

    /// Reject values the renderer and player cannot use
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(ConfigError::Invalid("render width/height must be non-zero".into()));
        }
        if render.card_width == 0 || render.card_height == 0 {
            return Err(ConfigError::Invalid("card width/height must be non-zero".into()));
        }
        if render.fps == 0 {
            return Err(ConfigError::Invalid("render fps must be non-zero".into()));
        }
        Ok(())
    }

    /// Resolved post store path
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(default_storage_path)
    }
}

/// `<config_dir>/cipherfeed/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cipherfeed").join("config.yaml"))
}

/// `<data_local_dir>/cipherfeed/cipherfeed_posts_v1.json`
pub fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cipherfeed")
        .join(POSTS_FILE)
}
