//! Azure OpenAI judge.
//!
//! Azure addresses a deployment rather than a model and authenticates with
//! an `api-key` header.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::http;
use super::openai_compatible::{send_chat_completion, ChatCompletionRequest};
use super::RequestParams;
use crate::{error::JudgeError, provider::JudgeProvider};

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Configuration for the Azure OpenAI judge.
#[derive(Debug)]
pub struct AzureOpenAIConfig {
    pub api_key: SecretString,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_version: String,
    pub deployment_id: String,
    pub params: RequestParams,
}

#[derive(Debug, Clone)]
pub struct AzureOpenAI {
    pub config: Arc<AzureOpenAIConfig>,
    pub client: Client,
}

impl AzureOpenAI {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: Option<String>,
        deployment_id: impl Into<String>,
        params: RequestParams,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, JudgeError> {
        Ok(Self {
            config: Arc::new(AzureOpenAIConfig {
                api_key: SecretString::new(api_key.into()),
                endpoint: endpoint.into(),
                api_version: api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                deployment_id: deployment_id.into(),
                params,
            }),
            client: http::build_client(timeout_seconds)?,
        })
    }

    fn completions_url(&self) -> String {
        http::join_url(
            &self.config.endpoint,
            &format!(
                "openai/deployments/{}/chat/completions",
                self.config.deployment_id
            ),
        )
    }
}

#[async_trait]
impl JudgeProvider for AzureOpenAI {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(JudgeError::AuthError(
                "Missing Azure OpenAI API key".to_string(),
            ));
        }

        let body = ChatCompletionRequest::json_object(None, prompt, self.config.params);
        http::trace_payload("Azure OpenAI", &body);

        let request = self
            .client
            .post(self.completions_url())
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", self.config.api_key.expose_secret())
            .json(&body);

        send_chat_completion("Azure OpenAI", request).await
    }

    fn name(&self) -> &str {
        "azure"
    }
}
