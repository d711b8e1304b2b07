//! Configuration management for docqa
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.docqa/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::args::{Args, Verbosity};
use crate::embedding::EmbeddingConfig;
use crate::errors::{QaError, Result};
use crate::llm::LlmConfig;
use crate::retrieval::RetrievalConfig;

/// Complete configuration for docqa
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub telemetry: TelemetryConfig,
}

/// Telemetry display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub color_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            color_output: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QaError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| QaError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.docqa/config.toml, when a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".docqa").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.embedding.model_id.trim().is_empty() {
            return Err(QaError::Config("embedding.model_id must not be empty".to_string()));
        }

        if self.embedding.max_length == 0 {
            return Err(QaError::Config(
                "embedding.max_length must be greater than 0".to_string(),
            ));
        }

        let threshold = self.retrieval.threshold;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(QaError::Config(format!(
                "retrieval.threshold must be between -1.0 and 1.0, got {}",
                threshold
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(QaError::Config(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(QaError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if Verbosity::from_name(&self.telemetry.default_verbosity).is_none() {
            return Err(QaError::Config(format!(
                "Invalid verbosity level: {}",
                self.telemetry.default_verbosity
            )));
        }

        Ok(())
    }

    /// Apply command-line overrides and re-validate
    pub fn apply_overrides(&mut self, args: &Args) -> Result<()> {
        if let Some(threshold) = args.threshold {
            self.retrieval.threshold = threshold;
        }
        if let Some(model_id) = &args.model_id {
            self.embedding.model_id = model_id.clone();
        }
        if let Some(model) = &args.llm_model {
            self.llm.model = model.clone();
        }
        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| QaError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| QaError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Pretty TOML rendering
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| QaError::Config(format!("Failed to serialize config: {}", e)))
    }
}
