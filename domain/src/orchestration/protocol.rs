//! Interaction protocol definitions.
//!
//! A [`Protocol`] fixes how the two agents are sequenced for one run:
//!
//! - **Review**: A writes code, then B reviews and corrects it (sequential, streamed)
//! - **Companion**: A plans the architecture, then B implements it (sequential, streamed)
//! - **Challenge**: A and B answer independently and concurrently (atomic, timed)

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The interaction pattern governing a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Agent A writes, Agent B reviews and corrects
    #[default]
    Review,
    /// Agent A plans, Agent B implements the plan
    Companion,
    /// Both agents build independently; the user decides the winner
    Challenge,
}

impl Protocol {
    pub const ALL: [Protocol; 3] = [Protocol::Review, Protocol::Companion, Protocol::Challenge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Review => "review",
            Protocol::Companion => "companion",
            Protocol::Challenge => "challenge",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Protocol::Review => "Review",
            Protocol::Companion => "Companion",
            Protocol::Challenge => "Challenge",
        }
    }

    /// Get a human-readable description of this protocol
    pub fn description(&self) -> &'static str {
        match self {
            Protocol::Review => "Model A writes, Model B reviews and corrects.",
            Protocol::Companion => "Models work together by reasoning during development.",
            Protocol::Challenge => "Models build independently. You decide the winner.",
        }
    }

    /// Whether agent output is streamed fragment by fragment
    pub fn is_streaming(&self) -> bool {
        !self.is_concurrent()
    }

    /// Whether both agents run at the same time
    pub fn is_concurrent(&self) -> bool {
        matches!(self, Protocol::Challenge)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "review" | "r" => Ok(Protocol::Review),
            "companion" | "c" => Ok(Protocol::Companion),
            "challenge" | "x" | "race" => Ok(Protocol::Challenge),
            _ => Err(DomainError::UnknownProtocol(s.to_string())),
        }
    }
}
