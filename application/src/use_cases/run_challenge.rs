//! Run Challenge use case
//!
//! Both agents answer the same prompt concurrently with atomic generation.
//! Each branch is timed from its own launch and writes its own paired message
//! as soon as it resolves. A failure in one branch never cancels or masks
//! the other; the earliest branch failure becomes the run's error.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::transcript_store::TranscriptStore;
use crate::use_cases::shared::{ProtocolContext, ProtocolRunner, RunProtocolError};
use async_trait::async_trait;
use duet_domain::{AgentModel, MessageId, Metrics, PromptTemplate, Protocol, Role};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

/// Use case for the Challenge protocol
pub struct RunChallengeUseCase {
    gateway: Arc<dyn LlmGateway>,
}

/// How one branch resolved
struct BranchOutcome {
    finished_at: Instant,
    result: Result<(), RunProtocolError>,
}

impl RunChallengeUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    async fn run_branch(
        &self,
        ctx: &ProtocolContext<'_>,
        role: Role,
        model: AgentModel,
        id: MessageId,
    ) -> BranchOutcome {
        let request = ctx.request(
            model,
            ctx.prompt.content(),
            PromptTemplate::challenge_system(),
        );
        let started = Instant::now();
        let result = self.gateway.generate(&request).await;
        let elapsed = started.elapsed();

        let result = match result {
            Ok(content) => {
                let metrics = Metrics::measure(&content, elapsed);
                info!(
                    "{} finished in {} ({} chars of {})",
                    model,
                    metrics.elapsed_display(),
                    metrics.code_length,
                    metrics.language
                );
                complete(ctx.transcript, &id, content, metrics).await;
                Ok(())
            }
            Err(e) => {
                warn!("{} failed after {:?}: {}", model, elapsed, e);
                fail(ctx.transcript, &id, &e).await;
                Err(RunProtocolError::agent(role, model, e))
            }
        };

        BranchOutcome {
            finished_at: Instant::now(),
            result,
        }
    }
}

async fn complete(transcript: &TranscriptStore, id: &MessageId, content: String, metrics: Metrics) {
    transcript
        .update(id, |m| {
            m.replace_content(content);
            m.attach_metrics(metrics);
            m.mark_complete();
        })
        .await;
}

async fn fail(transcript: &TranscriptStore, id: &MessageId, error: &GatewayError) {
    let reason = error.to_string();
    transcript
        .update(id, |m| {
            m.replace_content(format!("Generation failed: {}", reason));
            m.mark_failed(reason);
        })
        .await;
}

#[async_trait]
impl ProtocolRunner for RunChallengeUseCase {
    fn protocol(&self) -> Protocol {
        Protocol::Challenge
    }

    async fn run(&self, ctx: ProtocolContext<'_>) -> Result<(), RunProtocolError> {
        let (pairing_id, id_a, id_b) = ctx
            .transcript
            .append_pair(
                (Role::AgentA, PromptTemplate::challenger_label(&ctx.agent_a)),
                (Role::AgentB, PromptTemplate::challenger_label(&ctx.agent_b)),
            )
            .await;
        info!(
            "Challenge {}: {} vs {}",
            pairing_id, ctx.agent_a, ctx.agent_b
        );

        let (a, b) = tokio::join!(
            self.run_branch(&ctx, Role::AgentA, ctx.agent_a, id_a),
            self.run_branch(&ctx, Role::AgentB, ctx.agent_b, id_b),
        );

        let mut failures: Vec<_> = [a, b]
            .into_iter()
            .filter(|outcome| outcome.result.is_err())
            .collect();
        failures.sort_by_key(|outcome| outcome.finished_at);
        match failures.into_iter().next() {
            Some(first) => first.result,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::transcript_observer::TranscriptObserver;
    use crate::use_cases::test_support::{Script, ScriptedGateway};
    use duet_domain::{Credentials, Message, MessageStatus, Provider, UserPrompt};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct UpdateOrder(Mutex<Vec<(String, MessageStatus)>>);

    impl TranscriptObserver for UpdateOrder {
        fn on_message_appended(&self, _message: &Message) {}

        fn on_message_updated(&self, message: &Message) {
            self.0
                .lock()
                .unwrap()
                .push((message.label().unwrap_or_default().to_string(), message.status().clone()));
        }
    }

    async fn run(
        gateway: ScriptedGateway,
        transcript: &TranscriptStore,
        credentials: &Credentials,
    ) -> Result<(), RunProtocolError> {
        let prompt = UserPrompt::try_new("fizzbuzz").unwrap();
        RunChallengeUseCase::new(Arc::new(gateway))
            .run(ProtocolContext {
                prompt: &prompt,
                agent_a: AgentModel::GPT_4O,
                agent_b: AgentModel::CLAUDE_3_OPUS,
                credentials,
                transcript,
            })
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_pair_shares_id_and_times_independently() {
        let observer = Arc::new(UpdateOrder::default());
        let transcript = TranscriptStore::with_observer(observer.clone());
        let gateway = ScriptedGateway::new()
            .script(
                "gpt-4o",
                Script::reply(&["```python\nprint(1)\n```"]).with_delay(Duration::from_millis(100)),
            )
            .script(
                "claude-3-opus-latest",
                Script::reply(&["plain answer"]).with_delay(Duration::from_millis(400)),
            );

        run(gateway, &transcript, &Credentials::default()).await.unwrap();

        let messages = transcript.snapshot().await;
        assert_eq!(messages.len(), 2);
        let (a, b) = (&messages[0], &messages[1]);
        assert!(a.pairing_id().is_some());
        assert_eq!(a.pairing_id(), b.pairing_id());
        assert_eq!(a.label(), Some("GPT-4o"));
        assert_eq!(b.label(), Some("Claude 3 Opus"));

        let ma = a.metrics().unwrap();
        let mb = b.metrics().unwrap();
        assert_eq!(ma.elapsed, Duration::from_millis(100));
        assert_eq!(mb.elapsed, Duration::from_millis(400));
        assert_eq!(ma.language, "python");
        assert_eq!(ma.code_length, "print(1)\n".chars().count());
        assert_eq!(mb.language, "text");
        assert_eq!(mb.code_length, "plain answer".len());

        // The faster agent's message is updated first
        let order = observer.0.lock().unwrap().clone();
        assert_eq!(order[0].0, "GPT-4o");
        assert_eq!(order[1].0, "Claude 3 Opus");
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_does_not_mask_the_other_success() {
        let transcript = TranscriptStore::new();
        let gateway = ScriptedGateway::new()
            .script(
                "gpt-4o",
                Script::failing(GatewayError::MissingCredential(Provider::OpenAi)),
            )
            .script(
                "claude-3-opus-latest",
                Script::reply(&["done"]).with_delay(Duration::from_millis(200)),
            );

        let err = run(gateway, &transcript, &Credentials::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "OpenAI API Key is missing. Please add it in settings."
        );

        let messages = transcript.snapshot().await;
        assert!(matches!(messages[0].status(), MessageStatus::Failed(_)));
        assert_eq!(
            messages[0].content(),
            "Generation failed: OpenAI API Key is missing. Please add it in settings."
        );
        assert!(messages[0].metrics().is_none());
        assert_eq!(messages[1].status(), &MessageStatus::Complete);
        assert_eq!(messages[1].content(), "done");
        assert!(messages[1].metrics().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_earliest_failure_wins() {
        let transcript = TranscriptStore::new();
        let gateway = ScriptedGateway::new()
            .script(
                "gpt-4o",
                Script::failing(GatewayError::provider_error(Provider::OpenAi, "slow"))
                    .with_delay(Duration::from_millis(300)),
            )
            .script(
                "claude-3-opus-latest",
                Script::failing(GatewayError::provider_error(Provider::Anthropic, "fast"))
                    .with_delay(Duration::from_millis(50)),
            );

        let err = run(gateway, &transcript, &Credentials::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Anthropic request failed: fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_branches_launch_together() {
        let transcript = TranscriptStore::new();
        let gateway = Arc::new(
            ScriptedGateway::new()
                .script("gpt-4o", Script::reply(&["a"]).with_delay(Duration::from_secs(5)))
                .script("claude-3-opus-latest", Script::reply(&["b"])),
        );
        let prompt = UserPrompt::try_new("fizzbuzz").unwrap();
        let credentials = Credentials::default();
        RunChallengeUseCase::new(gateway.clone())
            .run(ProtocolContext {
                prompt: &prompt,
                agent_a: AgentModel::GPT_4O,
                agent_b: AgentModel::CLAUDE_3_OPUS,
                credentials: &credentials,
                transcript: &transcript,
            })
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].at, calls[1].at);
        assert!(
            calls
                .iter()
                .all(|c| c.system_instruction.as_deref() == Some(PromptTemplate::challenge_system()))
        );
    }
}
