use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::JudgeError;

pub(crate) fn build_client(timeout_seconds: Option<u64>) -> Result<Client, JudgeError> {
    let mut builder = Client::builder();
    if let Some(sec) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(sec));
    }
    Ok(builder.build()?)
}

pub(crate) fn trace_payload<T: Serialize>(provider: &str, body: &T) {
    if log::log_enabled!(log::Level::Trace) {
        if let Ok(json) = serde_json::to_string(body) {
            log::trace!("{provider} request payload: {json}");
        }
    }
}

/// Reads the body of `resp`, turning non-success statuses into errors.
pub(crate) async fn read_body(provider: &str, resp: Response) -> Result<String, JudgeError> {
    let status = resp.status();
    log::debug!("{provider} HTTP status: {status}");
    let body = resp.text().await?;

    match status {
        s if s.is_success() => Ok(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JudgeError::AuthError(format!(
            "{provider} rejected credentials ({status}): {body}"
        ))),
        _ => Err(JudgeError::HttpError(format!(
            "{provider} API error {status}: {body}"
        ))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, JudgeError> {
    serde_json::from_str(body).map_err(|err| JudgeError::ResponseFormatError {
        message: format!("unexpected {provider} response: {err}"),
        raw_response: body.to_string(),
    })
}

pub(crate) fn missing_field(provider: &str, field: &str, body: &str) -> JudgeError {
    JudgeError::ResponseFormatError {
        message: format!("{provider} response has no {field}"),
        raw_response: body.to_string(),
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
