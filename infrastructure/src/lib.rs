//! Infrastructure layer for duet
//!
//! Adapters implementing the application ports: HTTP vendor gateways,
//! the credential file store, the JSONL conversation logger, and
//! configuration file loading.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;

pub use config::{
    ConfigIssue, ConfigIssueCode, ConfigLoader, FileAgentsConfig, FileConfig, FileLoggingConfig,
    FileProvidersConfig, Severity,
};
pub use credentials::FileCredentialStore;
pub use logging::JsonlConversationLogger;
pub use providers::{
    AnthropicAdapter, GoogleAdapter, OpenAiAdapter, ProviderAdapter, ProviderHttpError,
    RoutingGateway,
};
