//! Per-provider credential set.
//!
//! [`Credentials`] is supplied by a credential store and treated as opaque
//! input to provider adapters. Blank strings count as absent so that a
//! cleared settings field behaves like a missing key.

use crate::core::model::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional secret per provider (Value Object)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for one provider
    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.set(provider, Some(key.into()));
        self
    }

    /// The key configured for `provider`, if non-blank
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        let slot = match provider {
            Provider::Google => &self.google,
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
        };
        slot.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Replace (or clear, with `None`) the key for `provider`
    pub fn set(&mut self, provider: Provider, key: Option<String>) {
        let key = key.filter(|k| !k.trim().is_empty());
        match provider {
            Provider::Google => self.google = key,
            Provider::OpenAi => self.openai = key,
            Provider::Anthropic => self.anthropic = key,
        }
    }

    /// Providers that currently have a key
    pub fn configured(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.key_for(*p).is_some())
            .collect()
    }
}

// Secrets never appear in logs or panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |p: Provider| if self.key_for(p).is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("google", &mask(Provider::Google))
            .field("openai", &mask(Provider::OpenAi))
            .field("anthropic", &mask(Provider::Anthropic))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for_ignores_blank_values() {
        let creds = Credentials {
            google: Some("   ".to_string()),
            openai: Some("sk-test".to_string()),
            anthropic: None,
        };
        assert_eq!(creds.key_for(Provider::Google), None);
        assert_eq!(creds.key_for(Provider::OpenAi), Some("sk-test"));
        assert_eq!(creds.key_for(Provider::Anthropic), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut creds = Credentials::new().with_key(Provider::Anthropic, "sk-ant");
        assert_eq!(creds.configured(), vec![Provider::Anthropic]);
        creds.set(Provider::Anthropic, None);
        assert!(creds.configured().is_empty());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::new().with_key(Provider::OpenAi, "sk-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<set>"));
    }

    #[test]
    fn test_json_shape_matches_settings_record() {
        let creds: Credentials = serde_json::from_str(r#"{"openai":"sk-1"}"#).unwrap();
        assert_eq!(creds.key_for(Provider::OpenAi), Some("sk-1"));
        assert_eq!(serde_json::to_string(&creds).unwrap(), r#"{"openai":"sk-1"}"#);
    }
}
