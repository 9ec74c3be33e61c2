//! LLM Gateway port
//!
//! Defines the Model Agent Capability: the uniform interface through which
//! protocol runners call a model, independent of which vendor backs it.

use async_trait::async_trait;
use duet_domain::{AgentModel, Credentials, Provider, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider's key is absent (Google falls back to a default first)
    #[error("{} API Key is missing. Please add it in settings.", .0.display_name())]
    MissingCredential(Provider),

    /// The backing service rejected or errored after dispatch
    #[error("{} request failed: {message}", .provider.display_name())]
    ProviderError { provider: Provider, message: String },
}

impl GatewayError {
    pub fn provider_error(provider: Provider, message: impl Into<String>) -> Self {
        GatewayError::ProviderError {
            provider,
            message: message.into(),
        }
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, GatewayError::MissingCredential(_))
    }

    pub fn provider(&self) -> Provider {
        match self {
            GatewayError::MissingCredential(p) => *p,
            GatewayError::ProviderError { provider, .. } => *provider,
        }
    }
}

/// One call to a model agent
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: AgentModel,
    pub prompt: String,
    pub credentials: Credentials,
    pub system_instruction: Option<String>,
}

impl GenerationRequest {
    pub fn new(model: AgentModel, prompt: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            credentials,
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Handle for receiving streamed fragments from one generation.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The sequence is ordered, finite
/// and not restartable; a mid-stream failure ends consumption but leaves
/// already-yielded fragments valid.
pub struct StreamHandle {
    provider: Provider,
    receiver: mpsc::Receiver<StreamEvent>,
    finished: bool,
}

impl StreamHandle {
    pub fn new(provider: Provider, receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self {
            provider,
            receiver,
            finished: false,
        }
    }

    /// Build a handle that replays `fragments` and then completes.
    pub fn from_fragments(provider: Provider, fragments: Vec<String>) -> Self {
        let (tx, rx) = mpsc::channel(fragments.len() + 1);
        for fragment in fragments {
            // Capacity covers every event, so try_send cannot fail here
            let _ = tx.try_send(StreamEvent::Delta(fragment));
        }
        let _ = tx.try_send(StreamEvent::Completed);
        Self::new(provider, rx)
    }

    /// Next fragment, `Ok(None)` once exhausted.
    ///
    /// A channel that closes without a terminal event is treated as
    /// exhausted, returning whatever has been received.
    pub async fn next_fragment(&mut self) -> Result<Option<String>, GatewayError> {
        if self.finished {
            return Ok(None);
        }
        match self.receiver.recv().await {
            Some(StreamEvent::Delta(chunk)) => Ok(Some(chunk)),
            Some(StreamEvent::Completed) | None => {
                self.finished = true;
                Ok(None)
            }
            Some(StreamEvent::Error(e)) => {
                self.finished = true;
                Err(GatewayError::provider_error(self.provider, e))
            }
        }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(chunk) = self.next_fragment().await? {
            full_text.push_str(&chunk);
        }
        Ok(full_text)
    }
}

/// Gateway for model agent calls
///
/// Implementations (adapters) live in the infrastructure layer and are
/// polymorphic over [`Provider`].
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate the complete response in one call
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;

    /// Generate the response as a lazy sequence of fragments.
    ///
    /// Credential failures are returned before the first fragment. Default
    /// implementation calls `generate()` and replays the result as one
    /// fragment, so adapters without streaming still work.
    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let text = self.generate(request).await?;
        Ok(StreamHandle::from_fragments(
            request.model.provider(),
            vec![text],
        ))
    }
}
