use thiserror::Error;

/// Error types that can occur while talking to an evaluator provider.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Network failures and non-success HTTP statuses
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Rejected or missing credentials
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or builder state
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors reported by the provider itself
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// Response body did not have the expected shape
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded { attempts: usize, last_error: String },
}

impl JudgeError {
    /// Whether the resilience layer should try the call again.
    pub fn is_retryable(&self) -> bool {
        match self {
            JudgeError::HttpError(_) => true,
            JudgeError::ProviderError(_) => true,
            JudgeError::ResponseFormatError { .. } => true,
            JudgeError::JsonError(_) => true,
            JudgeError::Generic(_) => true,
            JudgeError::RetryExceeded { .. } => false,
            JudgeError::AuthError(_) => false,
            JudgeError::InvalidRequest(_) => false,
        }
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        JudgeError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for JudgeError {
    fn from(err: serde_json::Error) -> Self {
        JudgeError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
