//! Google Gemini judge using `generateContent` with a JSON response MIME type.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http;
use super::RequestParams;
use crate::{error::JudgeError, prompt::JSON_ONLY_INSTRUCTION, provider::JudgeProvider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug)]
pub struct GoogleConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub params: RequestParams,
}

#[derive(Debug, Clone)]
pub struct Google {
    pub config: Arc<GoogleConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleRequest<'a> {
    contents: Vec<GoogleContent<'a>>,
    generation_config: GoogleGenerationConfig,
}

#[derive(Serialize, Debug)]
struct GoogleContent<'a> {
    parts: Vec<GooglePart<'a>>,
}

#[derive(Serialize, Debug)]
struct GooglePart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize, Debug)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize, Debug)]
struct GoogleCandidate {
    content: Option<GoogleResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GoogleResponseContent {
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

#[derive(Deserialize, Debug)]
struct GoogleResponsePart {
    text: Option<String>,
}

impl GoogleResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl Google {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        params: RequestParams,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, JudgeError> {
        Ok(Self {
            config: Arc::new(GoogleConfig {
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
impl JudgeProvider for Google {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(JudgeError::AuthError("Missing Google API key".into()));
        }

        let prompt = format!("{prompt}{JSON_ONLY_INSTRUCTION}");
        let body = GoogleRequest {
            contents: vec![GoogleContent {
                parts: vec![GooglePart { text: &prompt }],
            }],
            generation_config: GoogleGenerationConfig {
                temperature: self.config.params.temperature,
                max_output_tokens: self.config.params.max_tokens,
                response_mime_type: "application/json",
            },
        };
        http::trace_payload("Google", &body);

        let url = http::join_url(
            &self.config.base_url,
            &format!("models/{}:generateContent", self.config.model),
        );
        let resp = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let raw = http::read_body("Google", resp).await?;
        let parsed: GoogleResponse = http::decode("Google", &raw)?;
        parsed.first_text().ok_or_else(|| {
            http::missing_field("Google", "candidates[0].content.parts[0].text", &raw)
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn judge(base_url: String) -> Google {
        Google::new(
            "g-key",
            Some(base_url),
            Some("gemini-test".into()),
            RequestParams::default(),
            Some(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn passes_key_as_query_and_requests_json_mime() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {
                    "maxOutputTokens": 12000,
                    "responseMimeType": "application/json"
                }
            })))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "{\"scores\": {}}"}]}}]}"#)
            .create_async()
            .await;

        let text = judge(server.url()).judge("p").await.unwrap();
        assert_eq!(text, "{\"scores\": {}}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blocked_prompt_without_candidates_is_format_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let err = judge(server.url()).judge("p").await.unwrap_err();
        assert!(matches!(err, JudgeError::ResponseFormatError { .. }));
    }
}
