//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and resolved into domain types on demand.

mod agents;
mod logging;
mod providers;

pub use agents::FileAgentsConfig;
pub use logging::FileLoggingConfig;
pub use providers::{FileAnthropicConfig, FileGoogleConfig, FileOpenAiConfig, FileProvidersConfig};

use serde::{Deserialize, Serialize};

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work at all.
    Error,
    /// The configuration works but a value was ignored.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    ZeroTimeout,
    EmptyEnvVarName,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent A / Agent B models and the protocol
    pub agents: FileAgentsConfig,
    /// Vendor endpoints and limits
    pub providers: FileProvidersConfig,
    /// File and conversation logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.agents.to_selection().1;

        if self.providers.request_timeout_secs == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ZeroTimeout,
                message: "providers.request_timeout_secs cannot be 0".to_string(),
            });
        }

        if self.providers.google.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyEnvVarName,
                message: "providers.google.api_key_env is empty; no default Google key will be used"
                    .to_string(),
            });
        }

        issues
    }
}
