use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models;

/// Default generate endpoint of a local Ollama install.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inference endpoint the prompts are POSTed to
    pub endpoint: String,

    /// Model id used until the selector changes it
    pub default_model: String,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show HH:MM:SS next to each message header
    pub show_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_model: models::default_model_id().to_string(),
            ui: UiConfig { show_timestamps: true },
        }
    }
}

impl Config {
    /// Load configuration from ~/.edullama/config.toml, falling back to
    /// defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to ~/.edullama/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create .edullama directory")?;
        }
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Model id to start the session with, clamped to the catalog.
    pub fn starting_model(&self) -> &str {
        models::find(&self.default_model)
            .map(|m| m.id)
            .unwrap_or_else(models::default_model_id)
    }

    fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".edullama").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.default_model, models::default_model_id());
        assert!(config.ui.show_timestamps);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.default_model = "qwen3:8b".to_string();
        config.ui.show_timestamps = false;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.endpoint, config.endpoint);
        assert_eq!(parsed.default_model, "qwen3:8b");
        assert!(!parsed.ui.show_timestamps);
    }

    #[test]
    fn save_writes_toml_that_loads_back() {
        let dir = std::env::temp_dir().join(format!("edullama-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.default_model = "gemma3:1b".to_string();
        config.save_to(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.default_model, "gemma3:1b");
        assert_eq!(parsed.endpoint, config.endpoint);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_model_clamps_to_catalog_default() {
        let mut config = Config::default();
        config.default_model = "not-a-model".to_string();
        assert_eq!(config.starting_model(), models::default_model_id());
    }
}
