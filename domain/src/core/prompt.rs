//! User prompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A prompt submitted by the user (Value Object)
///
/// Guaranteed to contain at least one non-whitespace character. The
/// original text is kept verbatim, including surrounding whitespace,
/// because it is embedded literally into stage-2 prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrompt {
    content: String,
}

impl UserPrompt {
    /// Try to create a prompt, returning `None` if it is empty or blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for UserPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for UserPrompt {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserPrompt::try_new(s).ok_or(DomainError::EmptyPrompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_creation() {
        let p = UserPrompt::try_new("Write a binary search").unwrap();
        assert_eq!(p.content(), "Write a binary search");
    }

    #[test]
    fn test_blank_prompts_are_rejected() {
        assert!(UserPrompt::try_new("").is_none());
        assert!(UserPrompt::try_new("   \n\t ").is_none());
        assert_eq!("  ".parse::<UserPrompt>(), Err(DomainError::EmptyPrompt));
    }

    #[test]
    fn test_content_is_kept_verbatim() {
        let p = UserPrompt::try_new("  fizzbuzz in go \n").unwrap();
        assert_eq!(p.content(), "  fizzbuzz in go \n");
    }
}
