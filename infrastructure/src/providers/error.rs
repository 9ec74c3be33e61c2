//! Wire-level failures of the provider adapters

use duet_application::GatewayError;
use duet_domain::Provider;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to a vendor API
#[derive(Error, Debug)]
pub enum ProviderHttpError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Api(String),
}

impl ProviderHttpError {
    /// Build a status error, preferring the vendor's own error message
    pub fn from_status(status: u16, body: &str) -> Self {
        ProviderHttpError::Status {
            status,
            message: api_error_message(body).unwrap_or_else(|| truncate(body, 300)),
        }
    }

    pub fn into_gateway(self, provider: Provider) -> GatewayError {
        GatewayError::provider_error(provider, self.to_string())
    }
}

impl From<serde_json::Error> for ProviderHttpError {
    fn from(e: serde_json::Error) -> Self {
        ProviderHttpError::Decode(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// `{"error": {"message": ...}}` is shared by all three vendors
pub(crate) fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
