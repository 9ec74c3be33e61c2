//! Anthropic adapter (`/v1/messages`)

use super::error::ProviderHttpError;
use super::transport::{send, send_json, spawn_sse_pump};
use super::ProviderAdapter;
use async_trait::async_trait;
use duet_application::{GenerationRequest, StreamHandle};
use duet_domain::Provider;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicAdapter {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    max_tokens: u32,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn post(&self, request: &GenerationRequest, api_key: &str, stream: bool) -> reqwest::RequestBuilder {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} (model {}, stream {})", url, request.model.id(), stream);
        self.client
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request_body(request, self.max_tokens, stream))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<MessageParam<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Streaming events; only the ones carrying text or errors matter
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    Error { error: ApiError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn request_body(request: &GenerationRequest, max_tokens: u32, stream: bool) -> MessagesRequest<'_> {
    MessagesRequest {
        model: request.model.id(),
        max_tokens,
        system: request.system_instruction.as_deref(),
        messages: vec![MessageParam {
            role: "user",
            content: &request.prompt,
        }],
        stream,
    }
}

/// Text of the first text block
fn decode_response(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .unwrap_or_default()
}

fn decode_chunk(data: &str) -> Result<Option<String>, ProviderHttpError> {
    match serde_json::from_str::<StreamEvent>(data)? {
        StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        } => Ok(Some(text)),
        StreamEvent::Error { error } => Err(ProviderHttpError::Api(error.message)),
        _ => Ok(None),
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<String, ProviderHttpError> {
        let response: MessagesResponse = send_json(self.post(request, api_key, false)).await?;
        Ok(decode_response(response))
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<StreamHandle, ProviderHttpError> {
        let response = send(self.post(request, api_key, true)).await?;
        Ok(spawn_sse_pump(Provider::Anthropic, response, decode_chunk))
    }
}
