//! Session selection and run state

use crate::core::model::AgentModel;
use crate::orchestration::protocol::Protocol;
use serde::{Deserialize, Serialize};

/// The user's current choices for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSelection {
    pub agent_a: AgentModel,
    pub agent_b: AgentModel,
    pub protocol: Protocol,
}

impl Default for SessionSelection {
    fn default() -> Self {
        Self {
            agent_a: AgentModel::default_agent_a(),
            agent_b: AgentModel::default_agent_b(),
            protocol: Protocol::default(),
        }
    }
}

/// Snapshot of the session's run state
///
/// `processing` is true while any protocol is in flight. `error` holds the
/// message of the last failed run and is cleared by the next submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunState {
    pub protocol: Protocol,
    pub processing: bool,
    pub error: Option<String>,
}

impl RunState {
    pub fn idle(protocol: Protocol) -> Self {
        Self {
            protocol,
            processing: false,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let selection = SessionSelection::default();
        assert_eq!(selection.agent_a, AgentModel::GEMINI_3_FLASH);
        assert_eq!(selection.agent_b, AgentModel::GEMINI_31_PRO);
        assert_eq!(selection.protocol, Protocol::Review);
    }

    #[test]
    fn test_idle_state() {
        let state = RunState::idle(Protocol::Challenge);
        assert!(!state.processing);
        assert!(state.error.is_none());
    }
}
