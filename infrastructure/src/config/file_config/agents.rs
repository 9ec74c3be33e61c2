//! Agent and protocol selection from TOML (`[agents]` section)

use super::{ConfigIssue, ConfigIssueCode, Severity};
use duet_domain::{AgentModel, Protocol, SessionSelection};
use serde::{Deserialize, Serialize};

/// Agent selection from TOML
///
/// # Example
///
/// ```toml
/// [agents]
/// a = "gpt-4o"                   # Agent A
/// b = "claude-3-5-sonnet-latest" # Agent B
/// protocol = "challenge"         # review | companion | challenge
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub a: Option<String>,
    pub b: Option<String>,
    pub protocol: Option<String>,
}

impl FileAgentsConfig {
    fn parse_model(field: &str, value: Option<&String>) -> (Option<AgentModel>, Vec<ConfigIssue>) {
        let Some(id) = value else {
            return (None, Vec::new());
        };
        match id.parse::<AgentModel>() {
            Ok(model) => (Some(model), Vec::new()),
            Err(_) => {
                let valid_values: Vec<String> = AgentModel::catalog()
                    .iter()
                    .map(|m| m.id().to_string())
                    .collect();
                let message = format!(
                    "agents.{}: unknown model '{}', falling back to the default",
                    field, id
                );
                (
                    None,
                    vec![ConfigIssue {
                        severity: Severity::Warning,
                        code: ConfigIssueCode::InvalidEnumValue {
                            field: format!("agents.{}", field),
                            value: id.clone(),
                            valid_values,
                        },
                        message,
                    }],
                )
            }
        }
    }

    /// Parse Agent A's model id
    pub fn parse_a(&self) -> (Option<AgentModel>, Vec<ConfigIssue>) {
        Self::parse_model("a", self.a.as_ref())
    }

    /// Parse Agent B's model id
    pub fn parse_b(&self) -> (Option<AgentModel>, Vec<ConfigIssue>) {
        Self::parse_model("b", self.b.as_ref())
    }

    pub fn parse_protocol(&self) -> (Option<Protocol>, Vec<ConfigIssue>) {
        let Some(name) = self.protocol.as_ref() else {
            return (None, Vec::new());
        };
        match name.parse::<Protocol>() {
            Ok(protocol) => (Some(protocol), Vec::new()),
            Err(_) => (
                None,
                vec![ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "agents.protocol".to_string(),
                        value: name.clone(),
                        valid_values: Protocol::ALL
                            .iter()
                            .map(|p| p.as_str().to_string())
                            .collect(),
                    },
                    message: format!(
                        "agents.protocol: unknown value '{}', falling back to 'review'",
                        name
                    ),
                }],
            ),
        }
    }

    /// Resolve the session selection, falling back to defaults for bad values
    pub fn to_selection(&self) -> (SessionSelection, Vec<ConfigIssue>) {
        let defaults = SessionSelection::default();
        let (a, mut issues) = self.parse_a();
        let (b, b_issues) = self.parse_b();
        let (protocol, p_issues) = self.parse_protocol();
        issues.extend(b_issues);
        issues.extend(p_issues);
        (
            SessionSelection {
                agent_a: a.unwrap_or(defaults.agent_a),
                agent_b: b.unwrap_or(defaults.agent_b),
                protocol: protocol.unwrap_or(defaults.protocol),
            },
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_yields_defaults() {
        let (selection, issues) = FileAgentsConfig::default().to_selection();
        assert_eq!(selection, SessionSelection::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_valid_values() {
        let config = FileAgentsConfig {
            a: Some("gpt-4o".to_string()),
            b: Some("claude-3-opus-latest".to_string()),
            protocol: Some("companion".to_string()),
        };
        let (selection, issues) = config.to_selection();
        assert!(issues.is_empty());
        assert_eq!(selection.agent_a, AgentModel::GPT_4O);
        assert_eq!(selection.agent_b, AgentModel::CLAUDE_3_OPUS);
        assert_eq!(selection.protocol, Protocol::Companion);
    }

    #[test]
    fn test_unknown_values_warn_and_fall_back() {
        let config = FileAgentsConfig {
            a: Some("gpt-9".to_string()),
            b: None,
            protocol: Some("debate".to_string()),
        };
        let (selection, issues) = config.to_selection();
        assert_eq!(selection, SessionSelection::default());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(issues[0].message.contains("gpt-9"));
        assert!(issues[1].message.contains("debate"));
    }
}
