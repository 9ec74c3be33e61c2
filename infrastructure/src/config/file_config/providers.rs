//! Provider configuration from TOML (`[providers]` section)

use crate::providers::{anthropic, google, openai};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Google Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGoogleConfig {
    /// Environment variable holding the process-wide default key.
    pub api_key_env: String,
    /// Base URL for the Gemini API.
    pub base_url: String,
}

impl Default for FileGoogleConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: google::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FileGoogleConfig {
    /// Read the default Google key from the configured environment variable
    pub fn default_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// OpenAI API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Base URL (can point at an OpenAI-compatible proxy).
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: openai::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Anthropic API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// `anthropic-version` header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: anthropic::DEFAULT_BASE_URL.to_string(),
            max_tokens: anthropic::DEFAULT_MAX_TOKENS,
            api_version: anthropic::DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Per-request timeout in seconds; surfaces as a provider error.
    pub request_timeout_secs: u64,
    pub google: FileGoogleConfig,
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            google: FileGoogleConfig::default(),
            openai: FileOpenAiConfig::default(),
            anthropic: FileAnthropicConfig::default(),
        }
    }
}

impl FileProvidersConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
