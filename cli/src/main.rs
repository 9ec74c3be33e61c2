//! CLI entrypoint for duet
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use duet_application::{Orchestrator, SubmitOutcome, TranscriptStore};
use duet_domain::SessionSelection;
use duet_infrastructure::{
    ConfigLoader, FileConfig, FileCredentialStore, FileLoggingConfig, JsonlConversationLogger,
    RoutingGateway, Severity,
};
use duet_presentation::{ChatRepl, Cli, ConsoleFormatter, TranscriptRenderer};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.verbose, &config.logging);

    info!("Starting duet");
    check_config(&config)?;

    if cli.list_models {
        print!("{}", ConsoleFormatter::model_list(None));
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let credentials_path = ConfigLoader::credentials_path()
        .context("Could not determine the configuration directory")?;
    let credential_store = Arc::new(FileCredentialStore::new(credentials_path));
    let gateway = Arc::new(
        RoutingGateway::from_config(&config.providers)
            .context("Failed to build the HTTP client")?,
    );

    let renderer = TranscriptRenderer::new()
        .with_progress(!cli.quiet)
        .with_prompt_echo(!cli.chat);
    let transcript = TranscriptStore::with_observer(Arc::new(renderer));

    let mut orchestrator = Orchestrator::new(gateway, credential_store)
        .with_transcript(transcript)
        .with_selection(resolve_selection(&cli, &config));

    if config.logging.conversation_log {
        match config
            .logging
            .log_dir()
            .and_then(JsonlConversationLogger::in_dir)
        {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                orchestrator = orchestrator.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Conversation logging is enabled but no log file could be opened"),
        }
    }

    let mut credentials = orchestrator
        .load_credentials()
        .await
        .context("Failed to read stored API keys")?;

    if !cli.set_key.is_empty() {
        for assignment in &cli.set_key {
            credentials.set(assignment.provider, assignment.key.clone());
        }
        orchestrator
            .save_credentials(credentials.clone())
            .await
            .context("Failed to save API keys")?;
        let configured: Vec<&str> = credentials
            .configured()
            .iter()
            .map(|p| p.display_name())
            .collect();
        println!("Saved. Keys configured for: {}", provider_list(&configured));
        return Ok(ExitCode::SUCCESS);
    }

    // Chat mode
    if cli.chat {
        ChatRepl::new(Arc::new(orchestrator)).run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single prompt mode - prompt is required
    let Some(prompt) = cli.prompt else {
        bail!("A prompt is required. Use --chat for interactive mode.");
    };

    match orchestrator.submit(&prompt).await {
        SubmitOutcome::Completed => Ok(ExitCode::SUCCESS),
        SubmitOutcome::Failed(_) => Ok(ExitCode::FAILURE),
        SubmitOutcome::Rejected => bail!("Prompt cannot be empty"),
    }
}

/// Initialize tracing based on verbosity level, plus an optional daily file.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match logging.file.then(|| logging.log_dir()).flatten() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "duet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Print configuration issues; errors abort startup.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => eprintln!("warning: {}", issue.message),
            Severity::Error => eprintln!("error: {}", issue.message),
        }
    }
    if issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Config file selection, overridden by CLI flags
fn resolve_selection(cli: &Cli, config: &FileConfig) -> SessionSelection {
    let (mut selection, _) = config.agents.to_selection();
    if let Some(model) = cli.agent_a {
        selection.agent_a = model;
    }
    if let Some(model) = cli.agent_b {
        selection.agent_b = model;
    }
    if let Some(protocol) = cli.protocol {
        selection.protocol = protocol.into();
    }
    selection
}

fn provider_list(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
