//! OpenAI adapter (`/v1/chat/completions`)

use super::error::ProviderHttpError;
use super::transport::{send, send_json, spawn_sse_pump};
use super::ProviderAdapter;
use async_trait::async_trait;
use duet_application::{GenerationRequest, StreamHandle};
use duet_domain::Provider;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn post(
        &self,
        request: &GenerationRequest,
        api_key: &str,
        stream: bool,
    ) -> reqwest::RequestBuilder {
        let url = self.endpoint();
        debug!("POST {} (model {}, stream {})", url, request.model.id(), stream);
        self.client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body(request, stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatContent>,
    delta: Option<ChatContent>,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

fn request_body(request: &GenerationRequest, stream: bool) -> ChatRequest<'_> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system_instruction.as_deref() {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &request.prompt,
    });
    ChatRequest {
        model: request.model.id(),
        messages,
        stream,
    }
}

fn decode_response(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default()
}

fn decode_chunk(data: &str) -> Result<Option<String>, ProviderHttpError> {
    let chunk: StreamChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(ProviderHttpError::Api(error.message));
    }
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content))
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<String, ProviderHttpError> {
        let response: ChatResponse = send_json(self.post(request, api_key, false)).await?;
        Ok(decode_response(response))
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<StreamHandle, ProviderHttpError> {
        let response = send(self.post(request, api_key, true)).await?;
        Ok(spawn_sse_pump(Provider::OpenAi, response, decode_chunk))
    }
}
