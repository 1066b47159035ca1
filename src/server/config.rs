//! Configuration loading for pricecastd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.pricecast/config.toml` (user)
//! 3. `/etc/pricecast/config.toml` (system)
//! 4. built-in defaults
//!
//! Command-line flags and their environment variables (`PORT`,
//! `PRICECAST_HOST`, `PRICECAST_MODEL`) override whatever the file says.

use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::features::{FeatureAssembler, FeatureLayout};
use crate::types::CatalogPolicy;
use crate::{PricecastError, Result};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: 0.0.0.0).
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (default: 5000).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn address(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            PricecastError::Configuration(format!("Invalid host {:?}: {e}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Model artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Artifact path, relative paths resolve against the working directory
    /// (default: Price_model.json).
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("Price_model.json")
}

/// Feature layout configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturesConfig {
    /// Pin the vector width instead of asking the model.
    #[serde(default)]
    pub width: Option<usize>,
    /// Value for positions past the seven input fields (default: 0.0).
    #[serde(default)]
    pub fill_value: f64,
}

impl FeaturesConfig {
    /// Build the assembler this section describes.
    pub fn assembler(&self) -> Result<FeatureAssembler> {
        let layout = match self.width {
            Some(width) => FeatureLayout::fixed(width)?,
            None => FeatureLayout::from_model(),
        };
        Ok(FeatureAssembler::new(layout.with_fill_value(self.fill_value)?))
    }
}

/// Request validation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// How to treat codes missing from the catalog (default: ignore).
    #[serde(default)]
    pub catalog: CatalogPolicy,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.pricecast/config.toml`
    /// 3. `/etc/pricecast/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PricecastError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PricecastError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(PricecastError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".pricecast").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/pricecast/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
