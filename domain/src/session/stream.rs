//! Streaming events for agent generation.
//!
//! [`StreamEvent`] represents individual events in a streamed response,
//! enabling real-time display of agent output as it is generated.
//!
//! A well-formed stream is zero or more `Delta`s followed by exactly one
//! terminal event. The concatenation of all `Delta` texts equals the
//! equivalent atomic result.

/// An event in a streamed generation.
///
/// Bridges infrastructure-level streaming (SSE chunks from a provider) to
/// the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental text fragment, in provider order.
    Delta(String),
    /// The stream is exhausted; fragments received so far are the full response.
    Completed,
    /// The provider failed mid-stream; fragments already yielded stay valid.
    Error(String),
}

impl StreamEvent {
    /// Returns the fragment text if this is a Delta event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}
