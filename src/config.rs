use crate::error::{AdminError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionConfig {
    /// Model identifier passed to the generative API
    pub model: String,
    /// Size of each PDF text chunk, in characters
    pub chunk_size: usize,
    /// Fixed delay between consecutive extraction calls
    pub delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            AdminError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Defaults matching the operational contract with the extraction service:
    /// 5000-character chunks, 2 seconds between calls.
    pub fn default_extraction() -> ExtractionConfig {
        ExtractionConfig {
            model: "gemini-2.5-flash".to_string(),
            chunk_size: 5000,
            delay_ms: 2000,
            timeout_seconds: 60,
        }
    }
}
