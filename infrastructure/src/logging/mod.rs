//! Conversation transcript logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](duet_application::ConversationLogger) port by
//! appending one JSON object per event to a session file.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
