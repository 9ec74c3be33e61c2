//! Ordered transcript of messages

use super::entities::{Message, MessageId, PairingId};
use serde::Serialize;

/// Ordered append/update collection of messages (Aggregate)
///
/// Ordering is append order; updates keep a message in place. Identifiers
/// are issued from a single sequence shared by messages and pairings, so
/// they are unique within the transcript and sort in creation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
    #[serde(skip)]
    sequence: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next message identifier
    pub fn next_message_id(&mut self) -> MessageId {
        self.sequence += 1;
        MessageId::from_sequence(self.sequence)
    }

    /// Issue the next pairing identifier
    pub fn next_pairing_id(&mut self) -> PairingId {
        self.sequence += 1;
        PairingId::from_sequence(self.sequence)
    }

    /// Append a message. Returns `false` without inserting if the id is taken.
    pub fn append(&mut self, message: Message) -> bool {
        if self.get(message.id()).is_some() {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Apply `mutator` to the message with `id`. No-op if absent.
    ///
    /// Returns the mutator's result when the message exists.
    pub fn update<R>(&mut self, id: &MessageId, mutator: impl FnOnce(&mut Message) -> R) -> Option<R> {
        self.messages.iter_mut().find(|m| m.id() == id).map(mutator)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages sharing `pairing_id`, in append order
    pub fn paired(&self, pairing_id: &PairingId) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.pairing_id() == Some(pairing_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
