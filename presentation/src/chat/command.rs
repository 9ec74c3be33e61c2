//! Slash command parsing for the chat REPL

use duet_domain::{AgentModel, Protocol};

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Models,
    Mode(Protocol),
    AgentA(AgentModel),
    AgentB(AgentModel),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    ///
    /// Returns `Err` with a user-facing message for unknown commands or
    /// bad arguments.
    pub fn parse(line: &str) -> Result<Self, String> {
        let (command, args) = match line.trim().split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "/quit" | "/exit" | "/q" => Ok(Self::Quit),
            "/help" | "/h" | "/?" => Ok(Self::Help),
            "/models" => Ok(Self::Models),
            "/mode" => {
                if args.is_empty() {
                    return Err("Usage: /mode <review|companion|challenge>".to_string());
                }
                args.parse().map(Self::Mode).map_err(|e| format!("{}", e))
            }
            "/a" => Self::model_arg(args, "/a").map(Self::AgentA),
            "/b" => Self::model_arg(args, "/b").map(Self::AgentB),
            other => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                other
            )),
        }
    }

    fn model_arg(args: &str, command: &str) -> Result<AgentModel, String> {
        if args.is_empty() {
            return Err(format!("Usage: {} <model-id> (see /models)", command));
        }
        args.parse().map_err(|e| format!("{} (see /models)", e))
    }
}
