//! Domain layer for duet
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agents
//!
//! Two independently selected model descriptors, Agent A and Agent B, drawn
//! from a fixed catalog of six models across Google, OpenAI and Anthropic.
//!
//! ## Protocols
//!
//! - **Review**: A codes, B reviews (sequential, streamed)
//! - **Companion**: A plans, B implements (sequential, streamed)
//! - **Challenge**: A and B race (concurrent, atomic, timed)
//!
//! ## Transcript
//!
//! The ordered list of messages every protocol writes into. Challenge
//! messages are grouped by a shared pairing id.

pub mod core;
pub mod credentials;
pub mod metrics;
pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{AgentModel, Provider},
    prompt::UserPrompt,
};
pub use credentials::Credentials;
pub use metrics::{CodeMetrics, Metrics};
pub use orchestration::{
    protocol::Protocol,
    run_state::{RunState, SessionSelection},
};
pub use prompt::PromptTemplate;
pub use session::stream::StreamEvent;
pub use transcript::{
    aggregate::Transcript,
    entities::{GENERATING_PLACEHOLDER, Message, MessageId, MessageStatus, PairingId, Role},
};
