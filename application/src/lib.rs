//! Application layer for duet
//!
//! This crate contains the protocol runners, the orchestrator, the shared
//! transcript store and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod ports;
pub mod transcript_store;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credential_store::{CredentialStore, CredentialStoreError, InMemoryCredentialStore},
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway, StreamHandle},
    transcript_observer::{NoObserver, TranscriptObserver},
};
pub use transcript_store::TranscriptStore;
pub use use_cases::orchestrator::{Orchestrator, SubmitOutcome};
pub use use_cases::run_challenge::RunChallengeUseCase;
pub use use_cases::run_companion::RunCompanionUseCase;
pub use use_cases::run_review::RunReviewUseCase;
pub use use_cases::shared::{ProtocolContext, ProtocolRunner, RunProtocolError};
