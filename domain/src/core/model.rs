//! Model value objects: providers and the fixed agent model catalog

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Vendor backing a model (Value Object)
///
/// The set is closed: every selectable model belongs to exactly one of
/// these providers, and provider dispatch in the infrastructure layer
/// matches on this enum instead of comparing tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    OpenAi,
    Anthropic,
}

impl Provider {
    /// All providers, in catalog order
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::OpenAi, Provider::Anthropic];

    /// Get the string tag for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Human-readable vendor name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Whether calls to this provider may fall back to a process-wide default key.
    ///
    /// Only Google does; OpenAI and Anthropic always require an explicit key.
    pub fn has_default_credential(&self) -> bool {
        matches!(self, Provider::Google)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(Provider::Google),
            "openai" | "gpt" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// A selectable model descriptor (Value Object)
///
/// Immutable. Two independently chosen descriptors (Agent A and Agent B)
/// are live per session; they only change through explicit selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentModel {
    id: &'static str,
    name: &'static str,
    provider: Provider,
}

impl AgentModel {
    pub const GEMINI_31_PRO: AgentModel = AgentModel::new(
        "gemini-3.1-pro-preview",
        "Gemini 3.1 Pro",
        Provider::Google,
    );
    pub const GEMINI_3_FLASH: AgentModel = AgentModel::new(
        "gemini-3-flash-preview",
        "Gemini 3 Flash",
        Provider::Google,
    );
    pub const GPT_4O: AgentModel = AgentModel::new("gpt-4o", "GPT-4o", Provider::OpenAi);
    pub const GPT_4O_MINI: AgentModel =
        AgentModel::new("gpt-4o-mini", "GPT-4o Mini", Provider::OpenAi);
    pub const CLAUDE_35_SONNET: AgentModel = AgentModel::new(
        "claude-3-5-sonnet-latest",
        "Claude 3.5 Sonnet",
        Provider::Anthropic,
    );
    pub const CLAUDE_3_OPUS: AgentModel = AgentModel::new(
        "claude-3-opus-latest",
        "Claude 3 Opus",
        Provider::Anthropic,
    );

    const fn new(id: &'static str, name: &'static str, provider: Provider) -> Self {
        Self { id, name, provider }
    }

    /// The fixed catalog of selectable models
    pub fn catalog() -> &'static [AgentModel] {
        &CATALOG
    }

    /// Look up a catalog entry by its exact identifier
    pub fn find(id: &str) -> Option<AgentModel> {
        CATALOG.iter().copied().find(|m| m.id == id)
    }

    /// Default model for Agent A (Gemini 3 Flash)
    pub fn default_agent_a() -> AgentModel {
        Self::GEMINI_3_FLASH
    }

    /// Default model for Agent B (Gemini 3.1 Pro)
    pub fn default_agent_b() -> AgentModel {
        Self::GEMINI_31_PRO
    }

    /// Vendor-side model identifier
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Display name (e.g. "GPT-4o")
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Picker label: `"<name> (<provider>)"`
    pub fn picker_label(&self) -> String {
        format!("{} ({})", self.name, self.provider)
    }
}

static CATALOG: [AgentModel; 6] = [
    AgentModel::GEMINI_31_PRO,
    AgentModel::GEMINI_3_FLASH,
    AgentModel::GPT_4O,
    AgentModel::GPT_4O_MINI,
    AgentModel::CLAUDE_35_SONNET,
    AgentModel::CLAUDE_3_OPUS,
];

impl fmt::Display for AgentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::str::FromStr for AgentModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentModel::find(s.trim()).ok_or_else(|| DomainError::UnknownModel(s.to_string()))
    }
}

impl Serialize for AgentModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id)
    }
}

impl<'de> Deserialize<'de> for AgentModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
