//! Wire adapters for the three model vendors.
//!
//! Each adapter speaks one vendor's HTTP API. [`RoutingGateway`] picks the
//! adapter by the model's [`Provider`] and resolves the API key, so adapters
//! only ever see a key that is present.

pub mod anthropic;
pub mod error;
pub mod google;
pub mod openai;
pub mod routing;
pub mod sse;
mod transport;

pub use anthropic::AnthropicAdapter;
pub use error::ProviderHttpError;
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;
pub use routing::RoutingGateway;

use async_trait::async_trait;
use duet_application::{GenerationRequest, StreamHandle};
use duet_domain::Provider;

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Complete response in one call
    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<String, ProviderHttpError>;

    /// Streamed response. Errors before the first fragment are returned
    /// directly; later ones arrive through the handle.
    async fn generate_stream(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<StreamHandle, ProviderHttpError>;
}

/// Build the shared HTTP client
pub fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ProviderHttpError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("duet/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
