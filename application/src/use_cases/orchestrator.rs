//! Orchestrator
//!
//! Owns the session: the agent/protocol selection, the credential set, the
//! transcript and the run state. `submit` is the single entry point that
//! starts a protocol run; at most one run is in flight at a time.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::credential_store::{CredentialStore, CredentialStoreError};
use crate::ports::llm_gateway::LlmGateway;
use crate::transcript_store::TranscriptStore;
use crate::use_cases::run_challenge::RunChallengeUseCase;
use crate::use_cases::run_companion::RunCompanionUseCase;
use crate::use_cases::run_review::RunReviewUseCase;
use crate::use_cases::shared::{ProtocolContext, ProtocolRunner};
use duet_domain::{AgentModel, Credentials, Protocol, RunState, SessionSelection, UserPrompt};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Result of a `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank prompt or a run already in flight; nothing changed
    Rejected,
    /// The run reached its terminal state without error
    Completed,
    /// The run failed; the message is also stored as the session error
    Failed(String),
}

/// Clears the processing flag when dropped
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session orchestrator
pub struct Orchestrator {
    credential_store: Arc<dyn CredentialStore>,
    credentials: RwLock<Credentials>,
    selection: RwLock<SessionSelection>,
    transcript: TranscriptStore,
    processing: AtomicBool,
    error: Mutex<Option<String>>,
    review: RunReviewUseCase,
    companion: RunCompanionUseCase,
    challenge: RunChallengeUseCase,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn LlmGateway>, credential_store: Arc<dyn CredentialStore>) -> Self {
        Self {
            credential_store,
            credentials: RwLock::new(Credentials::default()),
            selection: RwLock::new(SessionSelection::default()),
            transcript: TranscriptStore::new(),
            processing: AtomicBool::new(false),
            error: Mutex::new(None),
            review: RunReviewUseCase::new(gateway.clone()),
            companion: RunCompanionUseCase::new(gateway.clone()),
            challenge: RunChallengeUseCase::new(gateway),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Use a transcript store wired to a renderer
    pub fn with_transcript(mut self, transcript: TranscriptStore) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_selection(mut self, selection: SessionSelection) -> Self {
        self.selection = RwLock::new(selection);
        self
    }

    // ==================== Credentials ====================

    /// Load the stored credential set into the session
    pub async fn load_credentials(&self) -> Result<Credentials, CredentialStoreError> {
        let loaded = self.credential_store.load()?;
        debug!("Loaded credentials for {:?}", loaded.configured());
        *self.credentials.write().await = loaded.clone();
        Ok(loaded)
    }

    /// Persist `credentials` and make them the session's set
    pub async fn save_credentials(
        &self,
        credentials: Credentials,
    ) -> Result<(), CredentialStoreError> {
        self.credential_store.save(&credentials)?;
        *self.credentials.write().await = credentials;
        Ok(())
    }

    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    // ==================== Selection ====================

    pub async fn select_agent_a(&self, model: AgentModel) {
        self.selection.write().await.agent_a = model;
    }

    pub async fn select_agent_b(&self, model: AgentModel) {
        self.selection.write().await.agent_b = model;
    }

    pub async fn select_protocol(&self, protocol: Protocol) {
        self.selection.write().await.protocol = protocol;
    }

    pub async fn selection(&self) -> SessionSelection {
        *self.selection.read().await
    }

    // ==================== State ====================

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub async fn run_state(&self) -> RunState {
        RunState {
            protocol: self.selection.read().await.protocol,
            processing: self.is_processing(),
            error: self.error.lock().await.clone(),
        }
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    // ==================== Submit ====================

    fn runner(&self, protocol: Protocol) -> &dyn ProtocolRunner {
        match protocol {
            Protocol::Review => &self.review,
            Protocol::Companion => &self.companion,
            Protocol::Challenge => &self.challenge,
        }
    }

    /// Submit a prompt and run the active protocol to completion.
    ///
    /// Blank prompts and submissions while a run is in flight are rejected
    /// without touching the transcript or the error slot.
    pub async fn submit(&self, prompt: &str) -> SubmitOutcome {
        let Some(prompt) = UserPrompt::try_new(prompt) else {
            debug!("Rejected blank prompt");
            return SubmitOutcome::Rejected;
        };
        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejected prompt: a run is already in flight");
            return SubmitOutcome::Rejected;
        }
        let guard = ProcessingGuard(&self.processing);

        *self.error.lock().await = None;
        let selection = self.selection().await;
        let credentials = self.credentials().await;
        let observer = self.transcript.observer().clone();
        observer.on_run_start(selection.protocol);

        let user_id = self.transcript.append_user(prompt.content()).await;
        self.conversation_logger.log(ConversationEvent::new(
            "user_prompt",
            json!({
                "id": user_id.as_str(),
                "protocol": selection.protocol.as_str(),
                "agent_a": selection.agent_a.id(),
                "agent_b": selection.agent_b.id(),
                "content": prompt.content(),
            }),
        ));
        info!(
            "Running {} with {} and {}",
            selection.protocol.display_name(),
            selection.agent_a,
            selection.agent_b
        );

        let result = self
            .runner(selection.protocol)
            .run(ProtocolContext {
                prompt: &prompt,
                agent_a: selection.agent_a,
                agent_b: selection.agent_b,
                credentials: &credentials,
                transcript: &self.transcript,
            })
            .await;

        for message in self.transcript.messages_after(&user_id).await {
            self.conversation_logger
                .log(ConversationEvent::agent_response(&message));
        }

        let outcome = match result {
            Ok(()) => SubmitOutcome::Completed,
            Err(e) => {
                let message = e.to_string();
                warn!("Run failed: {}", message);
                self.conversation_logger.log(ConversationEvent::new(
                    "run_failed",
                    json!({
                        "protocol": selection.protocol.as_str(),
                        "role": e.role().as_str(),
                        "error": message,
                    }),
                ));
                *self.error.lock().await = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        };

        drop(guard);
        observer.on_run_complete(&self.run_state().await);
        outcome
    }
}
