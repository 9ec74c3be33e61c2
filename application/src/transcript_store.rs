//! Shared transcript store
//!
//! The single piece of mutable state touched by concurrently running
//! agents. Every append and update is one critical section, so two agents
//! writing to different messages never lose each other's updates.

use crate::ports::transcript_observer::{NoObserver, TranscriptObserver};
use duet_domain::{Message, MessageId, PairingId, Role, Transcript};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cloneable handle to the session transcript
#[derive(Clone)]
pub struct TranscriptStore {
    inner: Arc<RwLock<Transcript>>,
    observer: Arc<dyn TranscriptObserver>,
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoObserver))
    }

    pub fn with_observer(observer: Arc<dyn TranscriptObserver>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Transcript::new())),
            observer,
        }
    }

    pub(crate) fn observer(&self) -> &Arc<dyn TranscriptObserver> {
        &self.observer
    }

    /// Issue a fresh message id without appending anything
    pub async fn next_message_id(&self) -> MessageId {
        self.inner.write().await.next_message_id()
    }

    /// Append a prepared message. Returns `false` if its id is already present.
    pub async fn append(&self, message: Message) -> bool {
        let appended = self.inner.write().await.append(message.clone());
        if appended {
            self.observer.on_message_appended(&message);
        }
        appended
    }

    /// Append a user message and return its id
    pub async fn append_user(&self, content: impl Into<String>) -> MessageId {
        let message = {
            let mut transcript = self.inner.write().await;
            let id = transcript.next_message_id();
            let message = Message::user(id, content);
            transcript.append(message.clone());
            message
        };
        self.observer.on_message_appended(&message);
        message.id().clone()
    }

    /// Append an empty agent message that will receive streamed fragments
    pub async fn append_streaming(&self, role: Role, label: impl Into<String>) -> MessageId {
        let message = {
            let mut transcript = self.inner.write().await;
            let id = transcript.next_message_id();
            let message = Message::streaming(id, role, label);
            transcript.append(message.clone());
            message
        };
        self.observer.on_message_appended(&message);
        message.id().clone()
    }

    /// Append two paired placeholders at the same logical instant.
    ///
    /// Both messages are inserted under one lock, so no other message can
    /// land between them.
    pub async fn append_pair(
        &self,
        first: (Role, String),
        second: (Role, String),
    ) -> (PairingId, MessageId, MessageId) {
        let (pairing_id, a, b) = {
            let mut transcript = self.inner.write().await;
            let pairing_id = transcript.next_pairing_id();
            let a = Message::paired(
                transcript.next_message_id(),
                first.0,
                first.1,
                pairing_id.clone(),
            );
            let b = Message::paired(
                transcript.next_message_id(),
                second.0,
                second.1,
                pairing_id.clone(),
            );
            transcript.append(a.clone());
            transcript.append(b.clone());
            (pairing_id, a, b)
        };
        debug!(pairing = %pairing_id, "Appended paired messages");
        self.observer.on_message_appended(&a);
        self.observer.on_message_appended(&b);
        (pairing_id, a.id().clone(), b.id().clone())
    }

    /// Apply `mutator` to the message with `id`. No-op if absent.
    pub async fn update<R>(
        &self,
        id: &MessageId,
        mutator: impl FnOnce(&mut Message) -> R,
    ) -> Option<R> {
        let updated = {
            let mut transcript = self.inner.write().await;
            transcript
                .update(id, mutator)
                .and_then(|r| transcript.get(id).cloned().map(|m| (r, m)))
        };
        updated.map(|(result, message)| {
            self.observer.on_message_updated(&message);
            result
        })
    }

    /// Apply one streamed fragment to the message with `id`
    pub async fn push_fragment(&self, id: &MessageId, fragment: &str) -> bool {
        let applied = self
            .inner
            .write()
            .await
            .update(id, |m| m.push_fragment(fragment))
            .is_some();
        if applied {
            self.observer.on_fragment(id, fragment);
        }
        applied
    }

    pub async fn get(&self, id: &MessageId) -> Option<Message> {
        self.inner.read().await.get(id).cloned()
    }

    /// Ordered copy of all messages
    pub async fn snapshot(&self) -> Vec<Message> {
        self.inner.read().await.messages().to_vec()
    }

    /// Messages appended after `id` (exclusive), in order
    pub async fn messages_after(&self, id: &MessageId) -> Vec<Message> {
        let transcript = self.inner.read().await;
        transcript
            .messages()
            .iter()
            .skip_while(|m| m.id() != id)
            .skip(1)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
