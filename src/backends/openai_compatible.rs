//! Shared client for services speaking the OpenAI chat-completions protocol.
//!
//! Providers plug in through [`CompatibleConfig`], which only carries the
//! constants that differ between them.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http;
use super::RequestParams;
use crate::{error::JudgeError, provider::JudgeProvider};

/// Per-provider constants for an OpenAI-compatible service.
pub trait CompatibleConfig: Send + Sync + 'static {
    const PROVIDER_NAME: &'static str;
    const DEFAULT_BASE_URL: &'static str;
    const DEFAULT_MODEL: &'static str;
}

#[derive(Serialize, Debug)]
pub(crate) struct CompatibleMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
}

impl ResponseFormat {
    pub(crate) const JSON_OBJECT: ResponseFormat = ResponseFormat {
        format_type: "json_object",
    };
}

/// Request payload for a chat-completions endpoint.
#[derive(Serialize, Debug)]
pub(crate) struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: Vec<CompatibleMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

impl<'a> ChatCompletionRequest<'a> {
    pub(crate) fn json_object(
        model: Option<&'a str>,
        prompt: &'a str,
        params: RequestParams,
    ) -> Self {
        Self {
            model,
            messages: vec![CompatibleMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            response_format: ResponseFormat::JSON_OBJECT,
        }
    }
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionMessage {
    content: Option<String>,
}

/// Sends a prepared chat-completions request and returns the first choice's content.
pub(crate) async fn send_chat_completion(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, JudgeError> {
    let resp = request.send().await?;
    let body = http::read_body(provider, resp).await?;
    let parsed: ChatCompletionResponse = http::decode(provider, &body)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| http::missing_field(provider, "choices[0].message.content", &body))
}

/// Settings for an OpenAI-compatible judge.
#[derive(Debug)]
pub struct CompatibleSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub params: RequestParams,
}

/// Judge client for any [`CompatibleConfig`] service, authenticated with a bearer token.
pub struct OpenAICompatibleJudge<C: CompatibleConfig> {
    pub config: Arc<CompatibleSettings>,
    pub client: Client,
    _provider: PhantomData<C>,
}

impl<C: CompatibleConfig> Clone for OpenAICompatibleJudge<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            _provider: PhantomData,
        }
    }
}

impl<C: CompatibleConfig> OpenAICompatibleJudge<C> {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        params: RequestParams,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, JudgeError> {
        Ok(Self::with_client(
            http::build_client(timeout_seconds)?,
            api_key,
            base_url,
            model,
            params,
        ))
    }

    /// Creates a judge with a caller-provided HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        params: RequestParams,
    ) -> Self {
        Self {
            config: Arc::new(CompatibleSettings {
                api_key: SecretString::new(api_key.into()),
                base_url: base_url.unwrap_or_else(|| C::DEFAULT_BASE_URL.to_string()),
                model: model.unwrap_or_else(|| C::DEFAULT_MODEL.to_string()),
                params,
            }),
            client,
            _provider: PhantomData,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl<C: CompatibleConfig> JudgeProvider for OpenAICompatibleJudge<C> {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(JudgeError::AuthError(format!(
                "Missing {} API key",
                C::PROVIDER_NAME
            )));
        }

        let body = ChatCompletionRequest::json_object(
            Some(&self.config.model),
            prompt,
            self.config.params,
        );
        http::trace_payload(C::PROVIDER_NAME, &body);

        let request = self
            .client
            .post(http::join_url(&self.config.base_url, "chat/completions"))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body);

        send_chat_completion(C::PROVIDER_NAME, request).await
    }

    fn name(&self) -> &str {
        C::PROVIDER_NAME
    }
}
