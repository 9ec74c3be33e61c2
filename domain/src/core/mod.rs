//! Core domain concepts shared across all subdomains.
//!
//! - [`model::AgentModel`] / [`model::Provider`] - the selectable model catalog
//! - [`prompt::UserPrompt`] - a validated, non-blank user prompt
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod prompt;
