//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording conversation events
//! (user prompts, agent responses, run failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! transcript of each run in a machine-readable format (JSONL).

use chrono::{DateTime, Utc};
use duet_domain::{Message, MessageStatus};
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_prompt", "agent_response", "run_failed").
    pub event_type: &'static str,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    /// Create a new conversation event with the current UTC timestamp.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Event describing a finished agent message.
    pub fn agent_response(message: &Message) -> Self {
        let metrics = message.metrics().map(|m| {
            json!({
                "time_ms": m.elapsed_ms() as u64,
                "code_length": m.code_length,
                "language": m.language,
            })
        });
        let event_type = match message.status() {
            MessageStatus::Complete => "agent_response",
            _ => "agent_failed",
        };
        Self::new(
            event_type,
            json!({
                "id": message.id().as_str(),
                "role": message.role().as_str(),
                "label": message.label(),
                "pairing_id": message.pairing_id().map(|p| p.as_str()),
                "content": message.content(),
                "metrics": metrics,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible so it never disrupts a
/// run; logging failures are dropped.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
