use secrecy::ExposeSecret;

use crate::{
    backends::{RequestParams, DEFAULT_TIMEOUT_SECONDS},
    error::JudgeError,
    provider::JudgeProvider,
    resilient::{ResilienceConfig, ResilientJudge},
};

use super::backend::JudgeBackend;
use super::judge_builder::JudgeBuilder;
use super::state::BuilderState;

impl JudgeBuilder {
    pub fn build(self) -> Result<Box<dyn JudgeProvider>, JudgeError> {
        self.state.build()
    }
}

impl BuilderState {
    fn build(mut self) -> Result<Box<dyn JudgeProvider>, JudgeError> {
        log::debug!(
            "Building evaluator provider. backend={:?} model={:?} temp={:?} resilient={:?}",
            self.backend,
            self.model,
            self.temperature,
            self.resilient_enable,
        );
        let backend = self
            .backend
            .take()
            .ok_or_else(|| JudgeError::InvalidRequest("No backend specified".to_string()))?;

        let provider = match backend {
            JudgeBackend::AzureOpenAI => build_azure(&mut self)?,
            JudgeBackend::OpenAI => build_openai(&mut self)?,
            JudgeBackend::Mistral => build_mistral(&mut self)?,
            JudgeBackend::Claude => build_anthropic(&mut self)?,
            JudgeBackend::Gemini => build_google(&mut self)?,
            JudgeBackend::Local => build_local(&mut self)?,
        };
        Ok(self.wrap_with_resilience(provider))
    }

    fn wrap_with_resilience(&self, provider: Box<dyn JudgeProvider>) -> Box<dyn JudgeProvider> {
        if !self.resilient_enable.unwrap_or(false) {
            return provider;
        }
        let defaults = ResilienceConfig::defaults();
        let cfg = ResilienceConfig {
            max_attempts: self.resilient_attempts.unwrap_or(defaults.max_attempts),
            min_delay_ms: self.resilient_min_delay_ms.unwrap_or(defaults.min_delay_ms),
            max_delay_ms: self.resilient_max_delay_ms.unwrap_or(defaults.max_delay_ms),
            multiplier_ms: self.resilient_multiplier_ms.unwrap_or(defaults.multiplier_ms),
            jitter: self.resilient_jitter.unwrap_or(defaults.jitter),
        };
        Box::new(ResilientJudge::new(provider, cfg))
    }

    fn params(&self) -> RequestParams {
        let defaults = RequestParams::default();
        RequestParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        }
    }

    fn timeout(&self) -> Option<u64> {
        Some(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn require_api_key(&mut self, provider: &str) -> Result<String, JudgeError> {
        match self.api_key.take() {
            Some(key) if !key.expose_secret().is_empty() => Ok(key.expose_secret().to_string()),
            _ => Err(JudgeError::InvalidRequest(format!(
                "No API key provided for {provider}"
            ))),
        }
    }

    fn require_base_url(&mut self, provider: &str) -> Result<String, JudgeError> {
        self.base_url.take().ok_or_else(|| {
            JudgeError::InvalidRequest(format!("No endpoint provided for {provider}"))
        })
    }
}

#[cfg(feature = "azure_openai")]
fn build_azure(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let api_key = state.require_api_key("Azure OpenAI")?;
    let endpoint = state.require_base_url("Azure OpenAI")?;
    let deployment = state
        .deployment_id
        .take()
        .or_else(|| state.model.clone())
        .ok_or_else(|| {
            JudgeError::InvalidRequest("No deployment provided for Azure OpenAI".to_string())
        })?;

    let provider = crate::backends::azure::AzureOpenAI::new(
        api_key,
        endpoint,
        state.api_version.take(),
        deployment,
        state.params(),
        state.timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "azure_openai"))]
fn build_azure(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "Azure OpenAI feature not enabled".to_string(),
    ))
}

#[cfg(feature = "openai")]
fn build_openai(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let api_key = state.require_api_key("OpenAI")?;
    let provider = crate::backends::openai::OpenAI::new(
        api_key,
        state.base_url.take(),
        state.model.take(),
        state.params(),
        state.timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "OpenAI feature not enabled".to_string(),
    ))
}

#[cfg(feature = "mistral")]
fn build_mistral(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let api_key = state.require_api_key("Mistral")?;
    let provider = crate::backends::mistral::Mistral::new(
        api_key,
        state.base_url.take(),
        state.model.take(),
        state.params(),
        state.timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "mistral"))]
fn build_mistral(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "Mistral feature not enabled".to_string(),
    ))
}

#[cfg(feature = "anthropic")]
fn build_anthropic(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let api_key = state.require_api_key("Anthropic")?;
    let provider = crate::backends::anthropic::Anthropic::new(
        api_key,
        state.base_url.take(),
        state.model.take(),
        state.params(),
        state.timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "Anthropic feature not enabled".to_string(),
    ))
}

#[cfg(feature = "google")]
fn build_google(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let api_key = state.require_api_key("Google")?;
    let provider = crate::backends::google::Google::new(
        api_key,
        state.base_url.take(),
        state.model.take(),
        state.params(),
        state.timeout(),
    )?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "google"))]
fn build_google(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "Google feature not enabled".to_string(),
    ))
}

#[cfg(feature = "local")]
fn build_local(state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    let endpoint = state.require_base_url("local evaluator")?;
    let provider = crate::backends::local::Local::new(endpoint, state.params(), state.timeout())?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "local"))]
fn build_local(_state: &mut BuilderState) -> Result<Box<dyn JudgeProvider>, JudgeError> {
    Err(JudgeError::InvalidRequest(
        "Local feature not enabled".to_string(),
    ))
}
