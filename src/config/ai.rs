//! Completion provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion provider configuration.
///
/// Model, temperature and output budget are fixed per deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Provider API key
    pub api_key: Option<Secret<String>>,

    /// OpenAI-compatible base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Value of the `HTTP-Referer` attribution header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value of the `X-Title` attribution header
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    /// Validate completion provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 || self.max_tokens > 4096 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidCompletionTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout() -> u64 {
    15
}

fn default_referer() -> String {
    "http://localhost:5173".to_string()
}

fn default_app_title() -> String {
    "AI Fitness Coach".to_string()
}
