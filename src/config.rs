//! Configuration management for `WhatToWear` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WearError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `WHATTOWEAR_WEATHER__API_KEY`
pub const ENV_PREFIX: &str = "WHATTOWEAR";

/// Root configuration structure for the `WhatToWear` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WearConfig {
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Local model configuration
    pub model: ModelConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Weather API key (required)
    pub api_key: String,
    /// Base URL for weather API
    pub base_url: String,
    /// Request timeout in seconds; the HTTP client default applies when unset
    pub timeout_seconds: Option<u64>,
}

/// Local LLM configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the GGUF model weights
    pub path: PathBuf,
    /// Context window in tokens
    pub context_size: u32,
    /// Layers offloaded to the GPU (0 = CPU only)
    pub gpu_layers: u32,
    /// Maximum number of generated tokens
    pub max_tokens: u32,
    /// Generation ends when this text shows up in the output
    pub stop_sequence: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models").join("llama-2-7b-chat.Q4_K_M.gguf")
}

fn default_context_size() -> u32 {
    1024
}

fn default_max_tokens() -> u32 {
    256
}

fn default_stop_sequence() -> String {
    "User:".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            context_size: default_context_size(),
            gpu_layers: 0,
            max_tokens: default_max_tokens(),
            stop_sequence: default_stop_sequence(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WearConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Load configuration, optionally reading environment overrides from `env`
    /// instead of the process environment
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicitly given file must exist; the default location is optional
        let (config_file, required) = match config_path {
            Some(path) => (path, true),
            None => (
                Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml")),
                false,
            ),
        };

        if required || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(required)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with WHATTOWEAR_ prefix
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: WearConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        // Apply defaults for values that were set but left empty
        config.apply_defaults();

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("what-to-wear").join("config.toml"))
    }

    /// Apply default values to configuration fields left empty
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.model.path.as_os_str().is_empty() {
            self.model.path = default_model_path();
        }
        if self.model.context_size == 0 {
            self.model.context_size = default_context_size();
        }
        if self.model.max_tokens == 0 {
            self.model.max_tokens = default_max_tokens();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the weather API key
    pub fn validate_api_key(&self) -> Result<()> {
        let api_key = self.weather.api_key.trim();
        if api_key.is_empty() {
            return Err(WearError::config(format!(
                "Weather API key is not set. Set {ENV_PREFIX}_WEATHER__API_KEY or weather.api_key in the config file"
            ))
            .into());
        }

        if api_key.len() > 100 {
            return Err(WearError::config(
                "Weather API key appears to be invalid (too long). Please check your API key."
            ).into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.weather.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(WearError::config(
                    "Weather API timeout must be between 1 and 300 seconds"
                ).into());
            }
        }

        if self.model.context_size > 32768 {
            return Err(WearError::config(
                "Model context size cannot exceed 32768 tokens"
            ).into());
        }

        if self.model.max_tokens >= self.model.context_size {
            return Err(WearError::config(format!(
                "Model max tokens ({}) must be smaller than the context size ({})",
                self.model.max_tokens, self.model.context_size
            )).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WearError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WearError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !self.weather.base_url.starts_with("http://") && !self.weather.base_url.starts_with("https://") {
            return Err(WearError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}
