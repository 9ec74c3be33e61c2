//! Scripted gateway shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway, StreamHandle};
use async_trait::async_trait;
use duet_domain::StreamEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;

/// What one model does when called
#[derive(Clone, Default)]
pub struct Script {
    pub fragments: Vec<String>,
    /// Delay before each fragment (streaming) or before the whole reply (atomic)
    pub delay: Duration,
    /// Error raised after all fragments were yielded
    pub failure: Option<GatewayError>,
    /// Calls block until this is notified
    pub gate: Option<Arc<Notify>>,
}

impl Script {
    pub fn reply(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failure(mut self, error: GatewayError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// A recorded call
#[derive(Debug, Clone)]
pub struct Call {
    pub model_id: &'static str,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub at: Instant,
}

/// Gateway that replays scripts keyed by model id
#[derive(Default)]
pub struct ScriptedGateway {
    scripts: HashMap<&'static str, Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, model_id: &'static str, script: Script) -> Self {
        self.scripts.insert(model_id, script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, request: &GenerationRequest) -> Script {
        self.calls.lock().unwrap().push(Call {
            model_id: request.model.id(),
            prompt: request.prompt.clone(),
            system_instruction: request.system_instruction.clone(),
            at: Instant::now(),
        });
        self.scripts
            .get(request.model.id())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let script = self.record(request);
        if let Some(gate) = &script.gate {
            gate.notified().await;
        }
        tokio::time::sleep(script.delay).await;
        match script.failure {
            Some(e) => Err(e),
            None => Ok(script.fragments.concat()),
        }
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let script = self.record(request);
        if let Some(gate) = &script.gate {
            gate.notified().await;
        }
        if script.fragments.is_empty()
            && let Some(GatewayError::MissingCredential(p)) = &script.failure
        {
            return Err(GatewayError::MissingCredential(*p));
        }

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            for fragment in script.fragments {
                tokio::time::sleep(script.delay).await;
                if tx.send(StreamEvent::Delta(fragment)).await.is_err() {
                    return;
                }
            }
            let last = match script.failure {
                Some(GatewayError::ProviderError { message, .. }) => StreamEvent::Error(message),
                Some(e) => StreamEvent::Error(e.to_string()),
                None => StreamEvent::Completed,
            };
            let _ = tx.send(last).await;
        });
        Ok(StreamHandle::new(request.model.provider(), rx))
    }
}
