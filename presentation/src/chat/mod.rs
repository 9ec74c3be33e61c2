//! Interactive chat module
//!
//! Provides a reedline-based interactive session over one orchestrator.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
