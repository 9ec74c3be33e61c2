//! Prompt domain
//!
//! System instructions, stage-2 prompt builders and message labels for
//! each protocol.

mod template;

pub use template::PromptTemplate;
