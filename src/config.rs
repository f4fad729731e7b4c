use std::path::{Path, PathBuf};

use secrecy::SecretString;

pub const DEFAULT_REALTIME_URL: &str = "wss://api.openai.com/v1/realtime";
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-4o-realtime-preview-2024-10-01";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

/// Process-level configuration for the relay.
#[derive(Debug)]
pub struct Config {
    api_key: SecretString,
    base_url: String,
    model: String,
    opening_dir: Option<PathBuf>,
}

impl Config {
    /// Reads configuration from the environment. Only the API key is
    /// required; endpoint and model have production defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: std::env::var("REALTIME_URL")
                .unwrap_or_else(|_| DEFAULT_REALTIME_URL.to_string()),
            model: std::env::var("REALTIME_MODEL")
                .unwrap_or_else(|_| DEFAULT_REALTIME_MODEL.to_string()),
            opening_dir: None,
        })
    }

    pub fn new(api_key: SecretString, base_url: &str, model: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.to_string(),
            model: model.to_string(),
            opening_dir: None,
        }
    }

    pub fn with_opening_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.opening_dir = dir;
        self
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn opening_dir(&self) -> Option<&Path> {
        self.opening_dir.as_deref()
    }
}
