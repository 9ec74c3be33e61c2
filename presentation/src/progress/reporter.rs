//! Console renderer driven by transcript observer callbacks
//!
//! Streamed stages are printed fragment by fragment as they arrive.
//! Challenge messages show a spinner while pending and are printed
//! together, with their metrics, once both halves are final.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use duet_application::TranscriptObserver;
use duet_domain::{
    Message, MessageId, MessageStatus, PairingId, Protocol, Role, RunState,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Renders transcript changes to the terminal
pub struct TranscriptRenderer {
    multi: MultiProgress,
    spinners: Mutex<HashMap<MessageId, ProgressBar>>,
    pairs: Mutex<HashMap<PairingId, Vec<Message>>>,
    show_progress: bool,
    echo_prompt: bool,
}

impl TranscriptRenderer {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinners: Mutex::new(HashMap::new()),
            pairs: Mutex::new(HashMap::new()),
            show_progress: true,
            echo_prompt: true,
        }
    }

    /// Set whether pending Challenge messages show a spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set whether the user's prompt is printed back (off in chat mode)
    pub fn with_prompt_echo(mut self, echo: bool) -> Self {
        self.echo_prompt = echo;
        self
    }

    fn spinner_style() -> Option<ProgressStyle> {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg} {elapsed:.dim}")
            .ok()
    }

    fn start_spinner(&self, message: &Message) {
        if !self.show_progress {
            return;
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Some(style) = Self::spinner_style() {
            pb.set_style(style);
        }
        pb.set_prefix(message.label().unwrap_or(message.role().as_str()).to_string());
        pb.set_message(message.content().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinners) = self.spinners.lock() {
            spinners.insert(message.id().clone(), pb);
        }
    }

    fn stop_spinner(&self, id: &MessageId) {
        let pb = self.spinners.lock().ok().and_then(|mut s| s.remove(id));
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }

    /// Record a final paired message; returns both halves (A first) once
    /// the second one arrives.
    fn collect_final(&self, message: &Message) -> Option<(Message, Message)> {
        let pairing = message.pairing_id()?;
        let mut pairs = self.pairs.lock().ok()?;
        let entry = pairs.entry(pairing.clone()).or_default();
        entry.retain(|m| m.id() != message.id());
        entry.push(message.clone());
        if entry.len() < 2 {
            return None;
        }
        let mut both = pairs.remove(pairing)?;
        both.sort_by_key(|m| m.role() != Role::AgentA);
        let b = both.pop()?;
        let a = both.pop()?;
        Some((a, b))
    }

    fn flush() {
        let _ = std::io::stdout().flush();
    }
}

impl Default for TranscriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptObserver for TranscriptRenderer {
    fn on_run_start(&self, protocol: Protocol) {
        println!(
            "{} {} {}",
            "->".cyan(),
            protocol.display_name().bold(),
            protocol.description().dimmed()
        );
    }

    fn on_message_appended(&self, message: &Message) {
        match (message.role(), message.status()) {
            (Role::User, _) => {
                if self.echo_prompt {
                    println!("\n{}", ConsoleFormatter::message_block(message));
                }
            }
            (_, MessageStatus::Pending) => self.start_spinner(message),
            (_, MessageStatus::Streaming) => {
                println!("\n{}", ConsoleFormatter::message_header(message));
            }
            _ => println!("\n{}", ConsoleFormatter::message_block(message)),
        }
        Self::flush();
    }

    fn on_fragment(&self, _id: &MessageId, fragment: &str) {
        print!("{}", fragment);
        Self::flush();
    }

    fn on_message_updated(&self, message: &Message) {
        if !message.status().is_final() {
            return;
        }

        if message.pairing_id().is_some() {
            self.stop_spinner(message.id());
            if let Some((a, b)) = self.collect_final(message) {
                let _ = self.multi.println(String::new());
                println!("{}", ConsoleFormatter::challenge_pair(&a, &b));
            }
            return;
        }

        println!();
        if let Some(metrics) = message.metrics() {
            println!("{}", ConsoleFormatter::metrics_line(metrics).dimmed());
        }
        if let Some(status) = ConsoleFormatter::status_line(message) {
            println!("{}", status);
        }
        Self::flush();
    }

    fn on_run_complete(&self, state: &RunState) {
        if let Ok(mut spinners) = self.spinners.lock() {
            for (_, pb) in spinners.drain() {
                pb.finish_and_clear();
            }
        }
        if let Some(error) = ConsoleFormatter::run_summary(state) {
            eprintln!("\n{}", error);
        }
        println!();
    }
}
