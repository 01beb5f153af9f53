use secrecy::SecretString;

use super::backend::JudgeBackend;

#[derive(Default)]
pub(crate) struct BuilderState {
    pub(crate) backend: Option<JudgeBackend>,
    pub(crate) api_key: Option<SecretString>,
    pub(crate) base_url: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) api_version: Option<String>,
    pub(crate) deployment_id: Option<String>,
    pub(crate) temperature: Option<f32>,
    pub(crate) max_tokens: Option<u32>,
    pub(crate) timeout_seconds: Option<u64>,
    pub(crate) resilient_enable: Option<bool>,
    pub(crate) resilient_attempts: Option<usize>,
    pub(crate) resilient_min_delay_ms: Option<u64>,
    pub(crate) resilient_max_delay_ms: Option<u64>,
    pub(crate) resilient_multiplier_ms: Option<u64>,
    pub(crate) resilient_jitter: Option<bool>,
}
