//! Run Review use case
//!
//! Agent A writes code, then Agent B reviews A's final code. Both stages are
//! streamed; stage 2 starts only once A's stream is exhausted.

use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{ProtocolContext, ProtocolRunner, RunProtocolError, stream_stage};
use async_trait::async_trait;
use duet_domain::{PromptTemplate, Protocol, Role};
use std::sync::Arc;
use tracing::info;

/// Use case for the Review protocol
pub struct RunReviewUseCase {
    gateway: Arc<dyn LlmGateway>,
}

impl RunReviewUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ProtocolRunner for RunReviewUseCase {
    fn protocol(&self) -> Protocol {
        Protocol::Review
    }

    async fn run(&self, ctx: ProtocolContext<'_>) -> Result<(), RunProtocolError> {
        info!("Review stage 1: {} codes", ctx.agent_a);
        let code = stream_stage(
            self.gateway.as_ref(),
            ctx.transcript,
            Role::AgentA,
            PromptTemplate::coder_label(&ctx.agent_a),
            ctx.request(
                ctx.agent_a,
                ctx.prompt.content(),
                PromptTemplate::coder_system(),
            ),
        )
        .await?;

        info!("Review stage 2: {} reviews", ctx.agent_b);
        stream_stage(
            self.gateway.as_ref(),
            ctx.transcript,
            Role::AgentB,
            PromptTemplate::reviewer_label(&ctx.agent_b),
            ctx.request(
                ctx.agent_b,
                PromptTemplate::review_prompt(ctx.prompt.content(), &code),
                PromptTemplate::reviewer_system(),
            ),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::transcript_store::TranscriptStore;
    use crate::use_cases::test_support::{Script, ScriptedGateway};
    use duet_domain::{AgentModel, Credentials, MessageStatus, Provider, UserPrompt};
    use std::time::Duration;

    fn context<'a>(
        prompt: &'a UserPrompt,
        credentials: &'a Credentials,
        transcript: &'a TranscriptStore,
    ) -> ProtocolContext<'a> {
        ProtocolContext {
            prompt,
            agent_a: AgentModel::GPT_4O,
            agent_b: AgentModel::CLAUDE_3_OPUS,
            credentials,
            transcript,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reviewer_sees_prompt_and_final_code() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .script(
                    "gpt-4o",
                    Script::reply(&["fn add", "(a, b)", " { a + b }"])
                        .with_delay(Duration::from_millis(50)),
                )
                .script("claude-3-opus-latest", Script::reply(&["Looks ", "good."])),
        );
        let transcript = TranscriptStore::new();
        let prompt = UserPrompt::try_new("write add").unwrap();
        let credentials = Credentials::default();

        RunReviewUseCase::new(gateway.clone())
            .run(context(&prompt, &credentials, &transcript))
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].model_id, "gpt-4o");
        assert_eq!(calls[0].prompt, "write add");
        assert_eq!(
            calls[0].system_instruction.as_deref(),
            Some(PromptTemplate::coder_system())
        );
        assert!(calls[1].prompt.contains("write add"));
        assert!(calls[1].prompt.contains("fn add(a, b) { a + b }"));
        // A's three fragments each took 50ms; B starts after all of them
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(150));

        let messages = transcript.snapshot().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].label(), Some("GPT-4o (Coder)"));
        assert_eq!(messages[0].content(), "fn add(a, b) { a + b }");
        assert_eq!(messages[1].label(), Some("Claude 3 Opus (Reviewer)"));
        assert_eq!(messages[1].content(), "Looks good.");
        assert!(messages.iter().all(|m| m.status() == &MessageStatus::Complete));
        assert!(messages.iter().all(|m| m.metrics().is_none()));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_stage_one_and_skips_stage_two() {
        let gateway = Arc::new(ScriptedGateway::new().script(
            "gpt-4o",
            Script::failing(GatewayError::MissingCredential(Provider::OpenAi)),
        ));
        let transcript = TranscriptStore::new();
        let prompt = UserPrompt::try_new("hi").unwrap();
        let credentials = Credentials::default();

        let err = RunReviewUseCase::new(gateway.clone())
            .run(context(&prompt, &credentials, &transcript))
            .await
            .unwrap_err();

        assert!(err.gateway_error().is_missing_credential());
        assert_eq!(
            err.to_string(),
            "OpenAI API Key is missing. Please add it in settings."
        );
        assert_eq!(gateway.calls().len(), 1);
        let messages = transcript.snapshot().await;
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0].status(), MessageStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_received_fragments() {
        let gateway = Arc::new(ScriptedGateway::new().script(
            "claude-3-opus-latest",
            Script::reply(&["partial ", "review"])
                .with_failure(GatewayError::provider_error(Provider::Anthropic, "overloaded")),
        ));
        let transcript = TranscriptStore::new();
        let prompt = UserPrompt::try_new("hi").unwrap();
        let credentials = Credentials::default();

        let err = RunReviewUseCase::new(gateway)
            .run(context(&prompt, &credentials, &transcript))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Anthropic request failed: overloaded");
        let messages = transcript.snapshot().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].status(), &MessageStatus::Complete);
        assert_eq!(messages[1].content(), "partial review");
        assert!(matches!(messages[1].status(), MessageStatus::Failed(_)));
    }
}
