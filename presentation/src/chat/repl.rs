//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use duet_application::{Orchestrator, SubmitOutcome};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const HISTORY_SIZE: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl {
    orchestrator: Arc<Orchestrator>,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            history_path: dirs::data_dir().map(|p| p.join("duet").join("history.txt")),
        }
    }

    /// Override where line history is kept (`None` disables it)
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    /// Run the interactive REPL until `/quit` or Ctrl-D
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = self.editor();
        self.print_welcome().await;

        loop {
            let protocol = self.orchestrator.selection().await.protocol;
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(format!("duet:{}", protocol)),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match ReplCommand::parse(line) {
                            Ok(ReplCommand::Quit) => {
                                println!("Bye!");
                                break;
                            }
                            Ok(command) => self.handle_command(command).await,
                            Err(message) => println!("{}", message.yellow()),
                        }
                        continue;
                    }

                    self.process_prompt(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│               duet - Chat Mode              │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!(
            "{}",
            ConsoleFormatter::selection(&self.orchestrator.selection().await)
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("{}", "Commands:".bold());
        println!("  /mode <protocol>  - Switch protocol (review, companion, challenge)");
        println!("  /a <model-id>     - Select Agent A");
        println!("  /b <model-id>     - Select Agent B");
        println!("  /models           - List models and the current selection");
        println!("  /help, /h, /?     - Show this help");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    async fn handle_command(&self, command: ReplCommand) {
        match command {
            ReplCommand::Quit => {}
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Models => {
                let selection = self.orchestrator.selection().await;
                println!("{}", ConsoleFormatter::model_list(Some(&selection)));
                println!("{}\n", ConsoleFormatter::selection(&selection));
            }
            ReplCommand::Mode(protocol) => {
                self.orchestrator.select_protocol(protocol).await;
                info!("Protocol switched to {}", protocol);
                println!(
                    "{} {}",
                    "Protocol:".bold(),
                    protocol.display_name().green()
                );
            }
            ReplCommand::AgentA(model) => {
                self.orchestrator.select_agent_a(model).await;
                println!("{} {}", "Agent A:".bold(), model.picker_label().green());
            }
            ReplCommand::AgentB(model) => {
                self.orchestrator.select_agent_b(model).await;
                println!("{} {}", "Agent B:".bold(), model.picker_label().green());
            }
        }
    }

    async fn process_prompt(&self, prompt: &str) {
        if let SubmitOutcome::Rejected = self.orchestrator.submit(prompt).await {
            println!("{}", "A run is already in progress.".yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use duet_application::{GatewayError, GenerationRequest, InMemoryCredentialStore, LlmGateway};
    use duet_domain::{AgentModel, Protocol};

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            Ok(request.prompt.clone())
        }
    }

    fn repl() -> ChatRepl {
        let orchestrator = Orchestrator::new(
            Arc::new(EchoGateway),
            Arc::new(InMemoryCredentialStore::default()),
        );
        ChatRepl::new(Arc::new(orchestrator)).with_history_path(None)
    }

    #[tokio::test]
    async fn test_commands_update_selection() {
        let repl = repl();
        repl.handle_command(ReplCommand::Mode(Protocol::Companion)).await;
        repl.handle_command(ReplCommand::AgentA(AgentModel::GPT_4O)).await;
        repl.handle_command(ReplCommand::AgentB(AgentModel::CLAUDE_3_OPUS)).await;

        let selection = repl.orchestrator.selection().await;
        assert_eq!(selection.protocol, Protocol::Companion);
        assert_eq!(selection.agent_a, AgentModel::GPT_4O);
        assert_eq!(selection.agent_b, AgentModel::CLAUDE_3_OPUS);
    }

    #[tokio::test]
    async fn test_listing_models_leaves_transcript_untouched() {
        let repl = repl();
        repl.handle_command(ReplCommand::Models).await;
        repl.handle_command(ReplCommand::Help).await;
        assert!(repl.orchestrator.transcript().is_empty().await);
    }
}
