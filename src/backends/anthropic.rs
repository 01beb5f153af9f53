//! Anthropic Claude judge using the Messages API.
//!
//! Claude has no JSON response mode, so the prompt gets an explicit
//! JSON-only instruction appended.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http;
use super::RequestParams;
use crate::{error::JudgeError, prompt::JSON_ONLY_INSTRUCTION, provider::JudgeProvider};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct AnthropicConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub params: RequestParams,
}

#[derive(Debug, Clone)]
pub struct Anthropic {
    pub config: Arc<AnthropicConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContent {
    text: Option<String>,
}

impl Anthropic {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        params: RequestParams,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, JudgeError> {
        Ok(Self {
            config: Arc::new(AnthropicConfig {
                api_key: SecretString::new(api_key.into()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                params,
            }),
            client: http::build_client(timeout_seconds)?,
        })
    }
}

#[async_trait]
impl JudgeProvider for Anthropic {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(JudgeError::AuthError("Missing Anthropic API key".into()));
        }

        let prompt = format!("{prompt}{JSON_ONLY_INSTRUCTION}");
        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.params.max_tokens,
            temperature: self.config.params.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &prompt,
            }],
        };
        http::trace_payload("Anthropic", &body);

        let resp = self
            .client
            .post(http::join_url(&self.config.base_url, "messages"))
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let raw = http::read_body("Anthropic", resp).await?;
        let parsed: AnthropicResponse = http::decode("Anthropic", &raw)?;
        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| http::missing_field("Anthropic", "content[0].text", &raw))
    }

    fn name(&self) -> &str {
        "claude"
    }
}
