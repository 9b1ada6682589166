//! LLM provider factory.
//!
//! Resolves a provider name to a client implementation, injecting secrets and
//! endpoint overrides. [`ClientFactory`] captures the resolved settings once so
//! that concurrent dispatch can build an independent client per task.

use crate::client::{ClientSource, LlmClient};
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use proofread_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "openrouter", "ollama")
/// * `model` - Model name (short catalog name or provider-specific id)
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by the hosted providers)
/// * `timeout` - Optional per-request timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required API key
/// is missing.
pub fn create_client(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider).ok_or_else(|| {
        AppError::Config(format!(
            "Unknown provider: {}. Supported providers: openai, openrouter, ollama",
            provider
        ))
    })?;

    match provider_type {
        ProviderType::Ollama => {
            let mut client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url, model),
                None => OllamaClient::new(model),
            };
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout)?;
            }
            Ok(Arc::new(client))
        }
        ProviderType::OpenAI | ProviderType::OpenRouter => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config(format!(
                    "{} provider requires an API key",
                    provider_type.as_str()
                ))
            })?;

            let mut client = if provider_type == ProviderType::OpenRouter {
                OpenAiClient::openrouter(api_key, model)
            } else {
                OpenAiClient::new(api_key, model)
            };
            if let Some(url) = endpoint {
                client = client.with_base_url(url);
            }
            if let Some(timeout) = timeout {
                client = client.with_timeout(timeout)?;
            }
            Ok(Arc::new(client))
        }
    }
}

/// Resolved provider settings that can mint fresh clients on demand.
#[derive(Debug, Clone)]
pub struct ClientFactory {
    provider: String,
    model: String,
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl ClientFactory {
    /// Create a factory from explicit settings.
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            endpoint: None,
            api_key: None,
            timeout: None,
        }
    }

    /// Resolve provider, model, endpoint, API key and timeout from configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let provider = config.provider.as_str();
        Ok(Self {
            provider: provider.to_string(),
            model: config.model.clone(),
            endpoint: config.resolve_endpoint(provider),
            api_key: config.resolve_api_key(provider),
            timeout: config.resolve_timeout(provider).map(Duration::from_secs),
        })
    }

    /// Set the endpoint override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Provider name this factory builds clients for.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model name this factory builds clients for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ClientSource for ClientFactory {
    fn create_client(&self) -> AppResult<Arc<dyn LlmClient>> {
        create_client(
            &self.provider,
            &self.model,
            self.endpoint.as_deref(),
            self.api_key.as_deref(),
            self.timeout,
        )
    }
}
