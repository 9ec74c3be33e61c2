//! Shared helpers for protocol runners.
//!
//! Contains the run context handed to every runner, the runner trait, and the
//! streamed-stage helper used by the sequential protocols (Review, Companion).

use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use crate::transcript_store::TranscriptStore;
use async_trait::async_trait;
use duet_domain::{AgentModel, Credentials, Protocol, Role, UserPrompt};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors propagated out of a protocol run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunProtocolError {
    /// One agent's generation failed; the message text is the gateway's
    #[error("{source}")]
    Agent {
        role: Role,
        model: AgentModel,
        #[source]
        source: GatewayError,
    },
}

impl RunProtocolError {
    pub fn agent(role: Role, model: AgentModel, source: GatewayError) -> Self {
        RunProtocolError::Agent {
            role,
            model,
            source,
        }
    }

    /// Which agent failed
    pub fn role(&self) -> Role {
        match self {
            RunProtocolError::Agent { role, .. } => *role,
        }
    }

    pub fn gateway_error(&self) -> &GatewayError {
        match self {
            RunProtocolError::Agent { source, .. } => source,
        }
    }
}

/// Everything a runner needs for one run
pub struct ProtocolContext<'a> {
    pub prompt: &'a UserPrompt,
    pub agent_a: AgentModel,
    pub agent_b: AgentModel,
    pub credentials: &'a Credentials,
    pub transcript: &'a TranscriptStore,
}

impl ProtocolContext<'_> {
    pub(crate) fn request(
        &self,
        model: AgentModel,
        prompt: impl Into<String>,
        system_instruction: &str,
    ) -> GenerationRequest {
        GenerationRequest::new(model, prompt, self.credentials.clone())
            .with_system_instruction(system_instruction)
    }
}

/// A fixed interaction pattern sequencing two agents
#[async_trait]
pub trait ProtocolRunner: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// Drive the transcript from the user's message to the terminal state
    async fn run(&self, ctx: ProtocolContext<'_>) -> Result<(), RunProtocolError>;
}

/// Stream one stage into a fresh message and return its final content.
///
/// Fragments are applied in the order the gateway yields them. On failure the
/// message keeps whatever arrived and is marked failed.
pub(crate) async fn stream_stage(
    gateway: &dyn LlmGateway,
    transcript: &TranscriptStore,
    role: Role,
    label: String,
    request: GenerationRequest,
) -> Result<String, RunProtocolError> {
    let model = request.model;
    let id = transcript.append_streaming(role, label).await;
    debug!(message = %id, model = model.id(), "Stage started");

    match drain_stream(gateway, transcript, &id, &request).await {
        Ok(content) => {
            transcript.update(&id, |m| m.mark_complete()).await;
            debug!(message = %id, chars = content.chars().count(), "Stage complete");
            Ok(content)
        }
        Err(e) => {
            warn!(message = %id, model = model.id(), "Stage failed: {}", e);
            let reason = e.to_string();
            transcript.update(&id, |m| m.mark_failed(reason)).await;
            Err(RunProtocolError::agent(role, model, e))
        }
    }
}

async fn drain_stream(
    gateway: &dyn LlmGateway,
    transcript: &TranscriptStore,
    id: &duet_domain::MessageId,
    request: &GenerationRequest,
) -> Result<String, GatewayError> {
    let mut stream = gateway.generate_stream(request).await?;
    let mut content = String::new();
    while let Some(fragment) = stream.next_fragment().await? {
        transcript.push_fragment(id, &fragment).await;
        content.push_str(&fragment);
    }
    Ok(content)
}
