//! Transcript entities

use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown while a Challenge agent is still working
pub const GENERATING_PLACEHOLDER: &str = "Generating...";

/// Unique, creation-order sortable message identifier
///
/// Issued from the transcript's sequence; zero-padded so lexical order
/// matches creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("msg-{seq:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation token grouping the two messages of one Challenge run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairingId(String);

impl PairingId {
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("challenge-{seq:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    AgentA,
    AgentB,
    /// Reserved for notices from the host. No protocol writes it; the session
    /// error lives in [`RunState`](crate::RunState), not in the transcript.
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::AgentA => "agent_a",
            Role::AgentB => "agent_b",
            Role::System => "system",
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Role::AgentA | Role::AgentB)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a message's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum MessageStatus {
    /// Waiting on an atomic generation (Challenge placeholder)
    Pending,
    /// Receiving streamed fragments
    Streaming,
    /// Content is final
    Complete,
    /// Generation failed; content holds whatever arrived before the failure
    Failed(String),
}

impl MessageStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, MessageStatus::Complete | MessageStatus::Failed(_))
    }
}

/// A message in the transcript (Entity)
///
/// Created once per logical turn. `content` only grows (streaming) or is
/// replaced wholesale (atomic); it is never truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    label: Option<String>,
    metrics: Option<Metrics>,
    pairing_id: Option<PairingId>,
    status: MessageStatus,
}

impl Message {
    /// A user turn; complete on creation
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            label: None,
            metrics: None,
            pairing_id: None,
            status: MessageStatus::Complete,
        }
    }

    /// An empty agent message that will receive streamed fragments
    pub fn streaming(id: MessageId, role: Role, label: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: String::new(),
            label: Some(label.into()),
            metrics: None,
            pairing_id: None,
            status: MessageStatus::Streaming,
        }
    }

    /// A paired Challenge placeholder awaiting an atomic result
    pub fn paired(id: MessageId, role: Role, label: impl Into<String>, pairing_id: PairingId) -> Self {
        Self {
            id,
            role,
            content: GENERATING_PLACEHOLDER.to_string(),
            label: Some(label.into()),
            metrics: None,
            pairing_id: Some(pairing_id),
            status: MessageStatus::Pending,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn pairing_id(&self) -> Option<&PairingId> {
        self.pairing_id.as_ref()
    }

    pub fn status(&self) -> &MessageStatus {
        &self.status
    }

    /// Append one streamed fragment
    pub fn push_fragment(&mut self, fragment: &str) {
        self.content.push_str(fragment);
    }

    /// Replace the content wholesale with an atomic result
    pub fn replace_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Attach metrics. Metrics are immutable once set; later calls are ignored.
    pub fn attach_metrics(&mut self, metrics: Metrics) {
        if self.metrics.is_none() {
            self.metrics = Some(metrics);
        }
    }

    pub fn mark_complete(&mut self) {
        self.status = MessageStatus::Complete;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = MessageStatus::Failed(reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ids_sort_in_creation_order() {
        let ids: Vec<_> = [9, 10, 100, 2].into_iter().map(MessageId::from_sequence).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(
            sorted.iter().map(MessageId::as_str).collect::<Vec<_>>(),
            vec!["msg-000002", "msg-000009", "msg-000010", "msg-000100"]
        );
    }

    #[test]
    fn test_streaming_message_grows() {
        let mut msg = Message::streaming(MessageId::from_sequence(1), Role::AgentA, "A (Coder)");
        assert_eq!(msg.content(), "");
        msg.push_fragment("fn ");
        msg.push_fragment("main");
        assert_eq!(msg.content(), "fn main");
        assert_eq!(msg.status(), &MessageStatus::Streaming);
    }

    #[test]
    fn test_paired_placeholder() {
        let pairing = PairingId::from_sequence(3);
        let msg = Message::paired(MessageId::from_sequence(4), Role::AgentB, "GPT-4o", pairing.clone());
        assert_eq!(msg.content(), GENERATING_PLACEHOLDER);
        assert_eq!(msg.pairing_id(), Some(&pairing));
        assert_eq!(msg.status(), &MessageStatus::Pending);
        assert!(!msg.status().is_final());
    }

    #[test]
    fn test_metrics_are_set_once() {
        let mut msg = Message::user(MessageId::from_sequence(1), "hi");
        msg.attach_metrics(Metrics::measure("a", Duration::from_millis(5)));
        msg.attach_metrics(Metrics::measure("bbbb", Duration::from_millis(9)));
        assert_eq!(msg.metrics().unwrap().code_length, 1);
    }

    #[test]
    fn test_failed_status_serializes_with_reason() {
        let status = MessageStatus::Failed("boom".to_string());
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"boom"}"#);
    }
}
