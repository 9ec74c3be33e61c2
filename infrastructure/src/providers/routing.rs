use super::{
    AnthropicAdapter, GoogleAdapter, OpenAiAdapter, ProviderAdapter, ProviderHttpError,
    http_client,
};
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use duet_application::{GatewayError, GenerationRequest, LlmGateway, StreamHandle};
use duet_domain::Provider;
use std::sync::Arc;
use tracing::debug;

/// Gateway that dispatches each request to the adapter for the model's provider.
///
/// Credential resolution happens here, before any network call: the
/// request's own key wins, Google alone may fall back to a process-wide
/// default, and any other absence is `MissingCredential`.
pub struct RoutingGateway {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    default_google_key: Option<String>,
}

impl RoutingGateway {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            adapters,
            default_google_key: None,
        }
    }

    /// Build the three vendor adapters from `[providers]` settings
    pub fn from_config(config: &FileProvidersConfig) -> Result<Self, ProviderHttpError> {
        let client = http_client(config.request_timeout())?;
        let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(GoogleAdapter::new(client.clone(), &config.google.base_url)),
            Arc::new(OpenAiAdapter::new(client.clone(), &config.openai.base_url)),
            Arc::new(
                AnthropicAdapter::new(client, &config.anthropic.base_url)
                    .with_api_version(&config.anthropic.api_version)
                    .with_max_tokens(config.anthropic.max_tokens),
            ),
        ];
        Ok(Self::new(adapters).with_default_google_key(config.google.default_key()))
    }

    /// Process-wide Google key used when the credential set has none
    pub fn with_default_google_key(mut self, key: Option<String>) -> Self {
        self.default_google_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    fn resolve(
        &self,
        request: &GenerationRequest,
    ) -> Result<(&dyn ProviderAdapter, String), GatewayError> {
        let provider = request.model.provider();
        let key = request
            .credentials
            .key_for(provider)
            .map(str::to_string)
            .or_else(|| {
                provider
                    .has_default_credential()
                    .then(|| self.default_google_key.clone())
                    .flatten()
            })
            .ok_or(GatewayError::MissingCredential(provider))?;

        let adapter = self
            .adapters
            .iter()
            .find(|a| a.provider() == provider)
            .ok_or_else(|| {
                GatewayError::provider_error(provider, "no adapter registered for this provider")
            })?;
        debug!("Routing {} to {} adapter", request.model.id(), provider);
        Ok((adapter.as_ref(), key))
    }
}

fn map_err(provider: Provider) -> impl FnOnce(ProviderHttpError) -> GatewayError {
    move |e| e.into_gateway(provider)
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let (adapter, key) = self.resolve(request)?;
        adapter
            .generate(request, &key)
            .await
            .map_err(map_err(adapter.provider()))
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let (adapter, key) = self.resolve(request)?;
        adapter
            .generate_stream(request, &key)
            .await
            .map_err(map_err(adapter.provider()))
    }
}
