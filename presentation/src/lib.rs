//! Presentation layer for duet
//!
//! This crate contains the CLI definition, console formatting, the live
//! transcript renderer, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, KeyAssignment, ProtocolArg};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::TranscriptRenderer;
