//! Code metrics derived from a finished agent response.
//!
//! [`CodeMetrics::extract`] scans fenced code blocks (```` ```lang ````
//! followed by a newline, a body, and a closing fence). Body lengths are
//! summed; the language is the tag of the last tagged block. Content with no
//! code falls back to its full length and the `"text"` language.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

/// Language reported when no fenced block carries a tag
pub const DEFAULT_LANGUAGE: &str = "text";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```").expect("fence pattern is valid")
});

/// Statistics about the code inside a response (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetrics {
    /// Total length of all fenced bodies, in characters
    pub code_length: usize,
    /// Tag of the last tagged fenced block
    pub language: String,
}

impl CodeMetrics {
    /// Compute metrics for `content`. Pure and deterministic.
    pub fn extract(content: &str) -> Self {
        let mut total = 0usize;
        let mut language = DEFAULT_LANGUAGE;

        for caps in FENCED_BLOCK.captures_iter(content) {
            if let Some(tag) = caps.get(1) {
                language = tag.as_str();
            }
            if let Some(body) = caps.get(2) {
                total += body.as_str().chars().count();
            }
        }

        let code_length = if total == 0 {
            content.chars().count()
        } else {
            total
        };

        Self {
            code_length,
            language: language.to_string(),
        }
    }
}

/// Metrics attached to a finished Challenge message (Value Object)
///
/// Computed once, after the agent's content is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Time from the agent's own launch to its resolution
    pub elapsed: Duration,
    pub code_length: usize,
    pub language: String,
}

impl Metrics {
    /// Build metrics from the final content and the measured elapsed time
    pub fn measure(content: &str, elapsed: Duration) -> Self {
        let CodeMetrics {
            code_length,
            language,
        } = CodeMetrics::extract(content);
        Self {
            elapsed,
            code_length,
            language,
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Elapsed time formatted as seconds with two decimals (e.g. `"1.25s"`)
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}s", self.elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_falls_back_to_content_length() {
        let content = "Just use a hash map.";
        let metrics = CodeMetrics::extract(content);
        assert_eq!(metrics.code_length, content.len());
        assert_eq!(metrics.language, "text");
    }

    #[test]
    fn test_single_tagged_block() {
        let body = format!("{}\n", "x".repeat(41));
        assert_eq!(body.len(), 42);
        let content = format!("Here you go:\n```python\n{body}```\nDone.");
        let metrics = CodeMetrics::extract(&content);
        assert_eq!(metrics.code_length, 42);
        assert_eq!(metrics.language, "python");
    }

    #[test]
    fn test_last_tag_wins_and_lengths_sum() {
        let content = "```js\n123456789\n```\n```go\n1234\n```";
        let metrics = CodeMetrics::extract(content);
        assert_eq!(metrics.code_length, 15);
        assert_eq!(metrics.language, "go");
    }

    #[test]
    fn test_untagged_block_keeps_previous_language() {
        let content = "```rust\nfn main() {}\n```\n```\nplain\n```";
        let metrics = CodeMetrics::extract(content);
        assert_eq!(metrics.language, "rust");
        assert_eq!(metrics.code_length, "fn main() {}\n".len() + "plain\n".len());
    }

    #[test]
    fn test_untagged_only_reports_text() {
        let metrics = CodeMetrics::extract("```\nx = 1\n```");
        assert_eq!(metrics.code_length, 6);
        assert_eq!(metrics.language, "text");
    }

    #[test]
    fn test_empty_content() {
        let metrics = CodeMetrics::extract("");
        assert_eq!(metrics.code_length, 0);
        assert_eq!(metrics.language, "text");
    }

    #[test]
    fn test_unterminated_fence_is_not_a_block() {
        let content = "```python\nprint('hi')";
        let metrics = CodeMetrics::extract(content);
        assert_eq!(metrics.code_length, content.chars().count());
        assert_eq!(metrics.language, "text");
    }

    #[test]
    fn test_non_ascii_tag_is_not_a_fence() {
        let content = "```ñ\nabc\n```";
        let metrics = CodeMetrics::extract(content);
        assert_eq!(metrics.code_length, 12);
        assert_eq!(metrics.language, "text");
    }

    #[test]
    fn test_lengths_count_characters() {
        let metrics = CodeMetrics::extract("```py\nprint('héllo')\n```");
        assert_eq!(metrics.code_length, "print('héllo')\n".chars().count());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let content = "```ts\nconst a = 1;\n```";
        assert_eq!(CodeMetrics::extract(content), CodeMetrics::extract(content));
    }

    #[test]
    fn test_metrics_measure_and_display() {
        let metrics = Metrics::measure("```go\nfmt.Println()\n```", Duration::from_millis(1250));
        assert_eq!(metrics.language, "go");
        assert_eq!(metrics.elapsed_ms(), 1250);
        assert_eq!(metrics.elapsed_display(), "1.25s");
    }
}
