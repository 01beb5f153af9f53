//! One evaluator client per supported service.

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "azure_openai")]
pub mod azure;
#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "mistral")]
pub mod mistral;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(any(feature = "openai", feature = "mistral", feature = "azure_openai"))]
pub mod openai_compatible;

pub(crate) mod http;

/// Sampling settings shared by every evaluator request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 12_000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
