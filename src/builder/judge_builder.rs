use secrecy::{ExposeSecret, SecretString};

use crate::config::ProviderConfig;

use super::{backend::JudgeBackend, state::BuilderState};

/// Builder for configuring and instantiating evaluator providers.
#[derive(Default)]
pub struct JudgeBuilder {
    pub(super) state: BuilderState,
}

impl JudgeBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from a resolved provider configuration.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let builder = Self::new()
            .backend(config.backend())
            .model(config.model());

        match config {
            ProviderConfig::AzureOpenAI {
                endpoint,
                api_key,
                api_version,
                deployment,
                ..
            } => builder
                .api_key(api_key.expose_secret().as_str())
                .base_url(endpoint)
                .api_version(api_version)
                .deployment_id(deployment),
            ProviderConfig::OpenAI { api_key, .. }
            | ProviderConfig::Mistral { api_key, .. }
            | ProviderConfig::Claude { api_key, .. }
            | ProviderConfig::Gemini { api_key, .. } => {
                builder.api_key(api_key.expose_secret().as_str())
            }
            ProviderConfig::Local { endpoint, .. } => builder.base_url(endpoint),
        }
    }

    /// Sets the backend provider to use.
    pub fn backend(mut self, backend: JudgeBackend) -> Self {
        self.state.backend = Some(backend);
        self
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.state.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Sets the base URL for API requests, or the endpoint for Azure and local backends.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.state.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.state.model = Some(model.into());
        self
    }

    /// Sets the Azure API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.state.api_version = Some(api_version.into());
        self
    }

    /// Sets the Azure deployment name.
    pub fn deployment_id(mut self, deployment_id: impl Into<String>) -> Self {
        self.state.deployment_id = Some(deployment_id.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.state.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.state.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.state.timeout_seconds = Some(timeout_seconds);
        self
    }
}
