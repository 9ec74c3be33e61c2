//! Console formatting for transcript messages
//!
//! Pure string builders; printing and timing live in the renderer.

use colored::Colorize;
use duet_domain::{AgentModel, Message, MessageStatus, Metrics, Role, RunState, SessionSelection};

/// Formats transcript messages for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Header line printed before a message body
    pub fn message_header(message: &Message) -> String {
        match message.role() {
            Role::User => format!("{}", "You".cyan().bold()),
            Role::System => format!("{}", "System".dimmed()),
            role => {
                let label = message.label().unwrap_or(role.as_str());
                let marker = match role {
                    Role::AgentA => "[A]".blue().bold(),
                    _ => "[B]".magenta().bold(),
                };
                format!("{} {}", marker, label.yellow().bold())
            }
        }
    }

    /// One-line metrics summary: `time 1.23s | code 42 chars | rust`
    pub fn metrics_line(metrics: &Metrics) -> String {
        format!(
            "time {} | code {} chars | {}",
            metrics.elapsed_display(),
            metrics.code_length,
            metrics.language
        )
    }

    /// Trailer printed once a message reaches a final status
    pub fn status_line(message: &Message) -> Option<String> {
        match message.status() {
            MessageStatus::Failed(reason) => {
                Some(format!("{} {}", "x".red(), reason.red()))
            }
            _ => None,
        }
    }

    /// A full message block: header, body, metrics and failure trailer
    pub fn message_block(message: &Message) -> String {
        let mut output = format!("{}\n{}\n", Self::message_header(message), message.content());
        if let Some(metrics) = message.metrics() {
            output.push_str(&format!("{}\n", Self::metrics_line(metrics).dimmed()));
        }
        if let Some(status) = Self::status_line(message) {
            output.push_str(&format!("{}\n", status));
        }
        output
    }

    /// Both halves of a Challenge pair, followed by a comparison
    pub fn challenge_pair(a: &Message, b: &Message) -> String {
        let mut output = Self::section_header("Challenge");
        output.push('\n');
        output.push_str(&Self::message_block(a));
        output.push('\n');
        output.push_str(&Self::message_block(b));

        if let (Some(ma), Some(mb)) = (a.metrics(), b.metrics()) {
            let label_a = a.label().unwrap_or("Agent A");
            let label_b = b.label().unwrap_or("Agent B");
            let faster = match ma.elapsed.cmp(&mb.elapsed) {
                std::cmp::Ordering::Less => label_a,
                std::cmp::Ordering::Greater => label_b,
                std::cmp::Ordering::Equal => "tie",
            };
            output.push_str(&format!(
                "\n{} {}\n",
                "Faster:".cyan().bold(),
                faster
            ));
        }
        output
    }

    /// Session error as shown after a failed run
    pub fn run_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message.red())
    }

    /// Catalog listing for `--list-models` and `/models`
    pub fn model_list(selection: Option<&SessionSelection>) -> String {
        let mut output = format!("{}\n", "Available models:".cyan().bold());
        for model in AgentModel::catalog() {
            let mut tags = Vec::new();
            if let Some(sel) = selection {
                if sel.agent_a == *model {
                    tags.push("A");
                }
                if sel.agent_b == *model {
                    tags.push("B");
                }
            }
            let tag = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(","))
            };
            output.push_str(&format!(
                "  {:<26} {}{}\n",
                model.id(),
                model.picker_label(),
                tag.green()
            ));
        }
        output
    }

    /// Current selection summary
    pub fn selection(selection: &SessionSelection) -> String {
        format!(
            "{} {}\n{} {}\n{} {} ({})",
            "Agent A: ".bold(),
            selection.agent_a.picker_label(),
            "Agent B: ".bold(),
            selection.agent_b.picker_label(),
            "Protocol:".bold(),
            selection.protocol.display_name(),
            selection.protocol.description()
        )
    }

    /// Final status after a one-shot run
    pub fn run_summary(state: &RunState) -> Option<String> {
        state.error.as_deref().map(Self::run_error)
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_domain::{MessageId, PairingId, Protocol};
    use std::time::Duration;

    fn plain() {
        colored::control::set_override(false);
    }

    fn finished(seq: u64, role: Role, label: &str, content: &str, ms: u64) -> Message {
        let mut msg = Message::paired(
            MessageId::from_sequence(seq),
            role,
            label,
            PairingId::from_sequence(1),
        );
        msg.replace_content(content);
        msg.attach_metrics(Metrics::measure(content, Duration::from_millis(ms)));
        msg.mark_complete();
        msg
    }

    #[test]
    fn test_metrics_line() {
        plain();
        let metrics = Metrics::measure("```go\nfmt.Println()\n```", Duration::from_millis(1234));
        assert_eq!(
            ConsoleFormatter::metrics_line(&metrics),
            "time 1.23s | code 14 chars | go"
        );
    }

    #[test]
    fn test_challenge_pair_names_faster_agent() {
        plain();
        let a = finished(2, Role::AgentA, "GPT-4o", "slow", 900);
        let b = finished(3, Role::AgentB, "Claude 3 Opus", "fast", 300);
        let text = ConsoleFormatter::challenge_pair(&a, &b);
        assert!(text.contains("[A] GPT-4o\nslow"));
        assert!(text.contains("[B] Claude 3 Opus\nfast"));
        assert!(text.contains("Faster: Claude 3 Opus"));
    }

    #[test]
    fn test_failed_message_block_shows_reason() {
        plain();
        let mut msg = Message::streaming(MessageId::from_sequence(4), Role::AgentB, "Reviewer");
        msg.push_fragment("partial");
        msg.mark_failed("connection reset");
        let text = ConsoleFormatter::message_block(&msg);
        assert!(text.starts_with("[B] Reviewer\npartial\n"));
        assert!(text.contains("x connection reset"));
    }

    #[test]
    fn test_model_list_marks_selection() {
        plain();
        let selection = SessionSelection {
            agent_a: AgentModel::GPT_4O,
            agent_b: AgentModel::GPT_4O,
            protocol: Protocol::Review,
        };
        let text = ConsoleFormatter::model_list(Some(&selection));
        let line = text.lines().find(|l| l.contains("GPT-4o (openai)")).unwrap();
        assert!(line.ends_with("[A,B]"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
