//! Provider configuration from TOML (`[providers]` section)

use crate::providers::OpenAiSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for any OpenAI-compatible API.
    pub base_url: String,
    pub temperature: f64,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            request_timeout_secs: 120,
        }
    }
}

impl FileOpenAiConfig {
    /// API key from the config file, else from the configured env var
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn to_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            api_key: self.resolve_api_key(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
}
