//! Self-hosted evaluator reachable over plain HTTP.
//!
//! The server may expose either a chat endpoint (`/chat`) or a raw
//! completion endpoint (`/generate`). The chat shape is tried first and the
//! completion shape only when it fails, including when `/chat` answers with a
//! body that is not JSON. The call fails only when both did.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::http;
use super::RequestParams;
use crate::{
    error::JudgeError,
    prompt::JSON_ONLY_INSTRUCTION,
    provider::JudgeProvider,
    unwrap::{unwrap_with, LOCAL_EVALUATOR_PROBES},
};

#[derive(Debug)]
pub struct LocalConfig {
    pub endpoint: String,
    pub params: RequestParams,
}

#[derive(Debug, Clone)]
pub struct Local {
    pub config: Arc<LocalConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct LocalMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct LocalChatRequest<'a> {
    messages: Vec<LocalMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct LocalGenerateRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    max_new_tokens: u32,
    stream: bool,
}

impl Local {
    pub fn new(
        endpoint: impl Into<String>,
        params: RequestParams,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, JudgeError> {
        Ok(Self {
            config: Arc::new(LocalConfig {
                endpoint: endpoint.into(),
                params,
            }),
            client: http::build_client(timeout_seconds)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<String, JudgeError> {
        let url = http::join_url(&self.config.endpoint, path);
        http::trace_payload("Local", body);
        let resp = self.client.post(&url).json(body).send().await?;
        let raw = http::read_body("Local", resp).await?;
        let value: Value = http::decode("Local", &raw)?;
        Ok(unwrap_with(&value, LOCAL_EVALUATOR_PROBES))
    }

    async fn chat(&self, prompt: &str) -> Result<String, JudgeError> {
        let body = LocalChatRequest {
            messages: vec![LocalMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.params.temperature,
            max_tokens: self.config.params.max_tokens,
            stream: false,
        };
        self.post("chat", &body).await
    }

    async fn generate(&self, prompt: &str) -> Result<String, JudgeError> {
        let body = LocalGenerateRequest {
            prompt,
            temperature: self.config.params.temperature,
            max_new_tokens: self.config.params.max_tokens,
            stream: false,
        };
        self.post("generate", &body).await
    }
}

#[async_trait]
impl JudgeProvider for Local {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        let prompt = format!("{prompt}{JSON_ONLY_INSTRUCTION}");

        let chat_err = match self.chat(&prompt).await {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        log::warn!(
            "Failed to evaluate with {}/chat: {chat_err}",
            self.config.endpoint.trim_end_matches('/')
        );

        match self.generate(&prompt).await {
            Ok(text) => Ok(text),
            Err(generate_err) => {
                log::warn!(
                    "Failed to evaluate with {}/generate: {generate_err}",
                    self.config.endpoint.trim_end_matches('/')
                );
                Err(JudgeError::ProviderError(format!(
                    "Failed to evaluate with local model at {}: \
                     chat: {chat_err}; generate: {generate_err}",
                    self.config.endpoint
                )))
            }
        }
    }

    fn name(&self) -> &str {
        "local"
    }
}
