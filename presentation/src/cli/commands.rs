//! CLI command definitions

use clap::{Parser, ValueEnum};
use duet_domain::{AgentModel, Protocol, Provider};
use std::path::PathBuf;

/// Collaboration protocol as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    /// A writes code, B reviews it
    Review,
    /// A plans, B implements the plan
    Companion,
    /// A and B answer the same prompt concurrently
    Challenge,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Review => Protocol::Review,
            ProtocolArg::Companion => Protocol::Companion,
            ProtocolArg::Challenge => Protocol::Challenge,
        }
    }
}

/// A `PROVIDER=KEY` pair from `--set-key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAssignment {
    pub provider: Provider,
    /// `None` clears the stored key
    pub key: Option<String>,
}

fn parse_key_assignment(s: &str) -> Result<KeyAssignment, String> {
    let (provider, key) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PROVIDER=KEY, got '{}'", s))?;
    let provider: Provider = provider.parse().map_err(|e| format!("{}", e))?;
    let key = key.trim();
    Ok(KeyAssignment {
        provider,
        key: (!key.is_empty()).then(|| key.to_string()),
    })
}

fn parse_model(s: &str) -> Result<AgentModel, String> {
    s.parse().map_err(|e| {
        let ids: Vec<&str> = AgentModel::catalog().iter().map(|m| m.id()).collect();
        format!("{} (available: {})", e, ids.join(", "))
    })
}

/// CLI arguments for duet
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(author, version, about = "Two coding agents, one prompt")]
#[command(long_about = r#"
duet sends your prompt to two language-model agents that collaborate
under one of three protocols:

  review     Agent A writes code, Agent B reviews it (streamed)
  companion  Agent A drafts a plan, Agent B implements it (streamed)
  challenge  Both agents answer at once; time, code length and language
             are compared side by side

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./duet.toml         Project-level config
3. ~/.config/duet/config.toml   Global config

API keys are kept in ~/.config/duet/credentials.json. A Google key may also
come from the GEMINI_API_KEY environment variable.

Example:
  duet --set-key openai=sk-...
  duet -p challenge --agent-a gpt-4o --agent-b claude-3-5-sonnet-latest "Write quicksort in Rust"
  duet --chat
"#)]
pub struct Cli {
    /// The prompt to send (not required in chat mode)
    pub prompt: Option<String>,

    /// Collaboration protocol
    #[arg(short, long, value_enum)]
    pub protocol: Option<ProtocolArg>,

    /// Model id for Agent A
    #[arg(long, value_name = "ID", value_parser = parse_model)]
    pub agent_a: Option<AgentModel>,

    /// Model id for Agent B
    #[arg(long, value_name = "ID", value_parser = parse_model)]
    pub agent_b: Option<AgentModel>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// List the available models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Store an API key (PROVIDER=KEY, empty KEY clears it) and exit
    #[arg(long, value_name = "PROVIDER=KEY", value_parser = parse_key_assignment)]
    pub set_key: Vec<KeyAssignment>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_shot() {
        let cli = Cli::try_parse_from([
            "duet",
            "-p",
            "challenge",
            "--agent-a",
            "gpt-4o",
            "--agent-b",
            "claude-3-opus-latest",
            "write fizzbuzz",
        ])
        .unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("write fizzbuzz"));
        assert_eq!(cli.protocol.map(Protocol::from), Some(Protocol::Challenge));
        assert_eq!(cli.agent_a, Some(AgentModel::GPT_4O));
        assert_eq!(cli.agent_b, Some(AgentModel::CLAUDE_3_OPUS));
        assert!(!cli.chat);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let err = Cli::try_parse_from(["duet", "--agent-a", "gpt-9", "hi"]).unwrap_err();
        assert!(err.to_string().contains("gpt-4o-mini"));
    }

    #[test]
    fn test_set_key_is_repeatable() {
        let cli = Cli::try_parse_from([
            "duet",
            "--set-key",
            "openai=sk-1",
            "--set-key",
            "google=",
        ])
        .unwrap();
        assert_eq!(
            cli.set_key,
            vec![
                KeyAssignment {
                    provider: Provider::OpenAi,
                    key: Some("sk-1".to_string()),
                },
                KeyAssignment {
                    provider: Provider::Google,
                    key: None,
                },
            ]
        );
    }

    #[test]
    fn test_key_assignment_needs_separator() {
        assert!(parse_key_assignment("openai").is_err());
        assert!(parse_key_assignment("mistral=abc").is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["duet", "-vv", "--chat"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.chat);
    }
}
