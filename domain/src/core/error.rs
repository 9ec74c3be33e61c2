//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("Prompt cannot be empty")]
    EmptyPrompt,
}
