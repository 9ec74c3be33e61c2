//! Google Gemini adapter (`generateContent` / `streamGenerateContent`)

use super::error::ProviderHttpError;
use super::transport::{send, send_json, spawn_sse_pump};
use super::ProviderAdapter;
use async_trait::async_trait;
use duet_application::{GenerationRequest, StreamHandle};
use duet_domain::Provider;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    /// Text of the first candidate, parts concatenated
    fn text(self) -> Result<String, ProviderHttpError> {
        if let Some(error) = self.error {
            return Err(ProviderHttpError::Api(error.message));
        }
        Ok(self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

fn request_body(request: &GenerationRequest) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user"),
            parts: vec![GeminiPart {
                text: &request.prompt,
            }],
        }],
        system_instruction: request.system_instruction.as_deref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text }],
        }),
    }
}

fn decode_chunk(data: &str) -> Result<Option<String>, ProviderHttpError> {
    let chunk: GeminiResponse = serde_json::from_str(data)?;
    chunk.text().map(Some)
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<String, ProviderHttpError> {
        let url = self.endpoint(request.model.id(), "generateContent");
        debug!("POST {}", url);
        let response: GeminiResponse = send_json(
            self.client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body(request)),
        )
        .await?;
        response.text()
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<StreamHandle, ProviderHttpError> {
        let url = self.endpoint(request.model.id(), "streamGenerateContent");
        debug!("POST {} (stream)", url);
        let response = send(
            self.client
                .post(&url)
                .query(&[("alt", "sse")])
                .header("x-goog-api-key", api_key)
                .json(&request_body(request)),
        )
        .await?;
        Ok(spawn_sse_pump(Provider::Google, response, decode_chunk))
    }
}
