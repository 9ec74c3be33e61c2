//! Run Companion use case
//!
//! Agent A plans an architecture, Agent B implements the plan.

use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{ProtocolContext, ProtocolRunner, RunProtocolError, stream_stage};
use async_trait::async_trait;
use duet_domain::{PromptTemplate, Protocol, Role};
use std::sync::Arc;
use tracing::info;

/// Use case for the Companion protocol
pub struct RunCompanionUseCase {
    gateway: Arc<dyn LlmGateway>,
}

impl RunCompanionUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ProtocolRunner for RunCompanionUseCase {
    fn protocol(&self) -> Protocol {
        Protocol::Companion
    }

    async fn run(&self, ctx: ProtocolContext<'_>) -> Result<(), RunProtocolError> {
        info!("Companion stage 1: {} plans", ctx.agent_a);
        let plan = stream_stage(
            self.gateway.as_ref(),
            ctx.transcript,
            Role::AgentA,
            PromptTemplate::architect_label(&ctx.agent_a),
            ctx.request(
                ctx.agent_a,
                ctx.prompt.content(),
                PromptTemplate::architect_system(),
            ),
        )
        .await?;

        info!("Companion stage 2: {} implements", ctx.agent_b);
        stream_stage(
            self.gateway.as_ref(),
            ctx.transcript,
            Role::AgentB,
            PromptTemplate::developer_label(&ctx.agent_b),
            ctx.request(
                ctx.agent_b,
                PromptTemplate::implementation_prompt(ctx.prompt.content(), &plan),
                PromptTemplate::developer_system(),
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

    #[tokio::test(start_paused = true)]
    async fn test_developer_receives_final_plan() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .script(
                    "gemini-3-flash-preview",
                    Script::reply(&["1. models\n", "2. routes\n"])
                        .with_delay(Duration::from_millis(30)),
                )
                .script(
                    "gemini-3.1-pro-preview",
                    Script::reply(&["```rust\nfn main() {}\n```"]),
                ),
        );
        let transcript = TranscriptStore::new();
        let prompt = UserPrompt::try_new("todo app").unwrap();
        let credentials = Credentials::default();

        RunCompanionUseCase::new(gateway.clone())
            .run(ProtocolContext {
                prompt: &prompt,
                agent_a: AgentModel::GEMINI_3_FLASH,
                agent_b: AgentModel::GEMINI_31_PRO,
                credentials: &credentials,
                transcript: &transcript,
            })
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(
            calls[0].system_instruction.as_deref(),
            Some(PromptTemplate::architect_system())
        );
        assert_eq!(
            calls[1].prompt,
            PromptTemplate::implementation_prompt("todo app", "1. models\n2. routes\n")
        );
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(60));

        let messages = transcript.snapshot().await;
        assert_eq!(messages[0].label(), Some("Gemini 3 Flash (Architect)"));
        assert_eq!(messages[1].label(), Some("Gemini 3.1 Pro (Developer)"));
        assert_eq!(messages[1].status(), &MessageStatus::Complete);
    }

    #[tokio::test]
    async fn test_developer_failure_surfaces_after_plan_completes() {
        let gateway = Arc::new(ScriptedGateway::new().script(
            "claude-3-5-sonnet-latest",
            Script::failing(GatewayError::MissingCredential(Provider::Anthropic)),
        ));
        let transcript = TranscriptStore::new();
        let prompt = UserPrompt::try_new("todo app").unwrap();
        let credentials = Credentials::default();

        let err = RunCompanionUseCase::new(gateway)
            .run(ProtocolContext {
                prompt: &prompt,
                agent_a: AgentModel::GEMINI_3_FLASH,
                agent_b: AgentModel::CLAUDE_35_SONNET,
                credentials: &credentials,
                transcript: &transcript,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunProtocolError::Agent {
                role: Role::AgentB,
                ..
            }
        ));
        let messages = transcript.snapshot().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].status(), &MessageStatus::Complete);
        assert!(matches!(messages[1].status(), MessageStatus::Failed(_)));
        assert_ne!(messages[1].content(), duet_domain::GENERATING_PLACEHOLDER);
    }
}
