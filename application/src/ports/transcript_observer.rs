//! Transcript observer port
//!
//! Defines how a rendering collaborator learns about transcript changes
//! while a protocol is running.

use duet_domain::{Message, MessageId, Protocol, RunState};

/// Callback for transcript changes during a run
///
/// Implementations live in the presentation layer and can display
/// messages in various ways (console, web UI, etc.). Callbacks are made
/// after the store's lock is released, with a snapshot of the message.
pub trait TranscriptObserver: Send + Sync {
    /// Called when a submission is accepted, before the user message is appended
    fn on_run_start(&self, _protocol: Protocol) {}

    /// Called after a message is appended
    fn on_message_appended(&self, message: &Message);

    /// Called for each streamed fragment, after it has been applied
    fn on_fragment(&self, _id: &MessageId, _fragment: &str) {}

    /// Called after a non-fragment update (completion, failure, atomic result)
    fn on_message_updated(&self, message: &Message);

    /// Called when the run ends, successfully or not
    fn on_run_complete(&self, _state: &RunState) {}
}

/// No-op observer for when rendering is not needed
pub struct NoObserver;

impl TranscriptObserver for NoObserver {
    fn on_message_appended(&self, _message: &Message) {}
    fn on_message_updated(&self, _message: &Message) {}
}
