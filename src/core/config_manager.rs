// src/core/config_manager.rs
//! Assembles the run configuration from environment, config file and CLI layers

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{AppConfig, ConfigLayer};
use crate::environment;
use crate::utils::get_file_extension;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub struct ConfigManager;

impl ConfigManager {
    /// Load all layers and resolve them.
    ///
    /// An explicitly requested config file must exist; the default
    /// `config.yaml` is optional.
    pub fn load(config_path: Option<&Path>, cli: ConfigLayer) -> Result<AppConfig> {
        let env_layer = environment::load();

        let file_layer = match config_path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_file(&default_path)?
                } else {
                    ConfigLayer::default()
                }
            }
        };

        let config = AppConfig::from_layers(env_layer, file_layer, cli);
        info!(
            "Using {:?} backend at {} with model {}",
            config.backend, config.endpoint, config.model
        );
        Ok(config)
    }

    /// Parse a config file; TOML for `.toml`, YAML otherwise.
    pub fn load_file(path: &Path) -> Result<ConfigLayer> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        info!("Loading configuration from {}", path.display());
        Self::parse(&content, get_file_extension(path).as_deref())
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str, extension: Option<&str>) -> Result<ConfigLayer> {
        if content.trim().is_empty() {
            return Ok(ConfigLayer::default());
        }

        let layer: ConfigLayer = match extension {
            Some("toml") => toml::from_str(content)?,
            _ => serde_yaml::from_str(content)?,
        };
        Ok(layer)
    }

    /// Ensure output directories exist before a run writes into them.
    pub async fn ensure_directories(config: &AppConfig) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&config.output_dir).await?;
        if config.move_to_bin {
            FsOps::ensure_dir_exists(&config.bin_dir).await?;
        }
        Ok(())
    }
}
