//! OpenAI chat-completions judge.

use super::openai_compatible::{CompatibleConfig, OpenAICompatibleJudge};

pub struct OpenAIConfig;

impl CompatibleConfig for OpenAIConfig {
    const PROVIDER_NAME: &'static str = "OpenAI";
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    const DEFAULT_MODEL: &'static str = "gpt-4o";
}

pub type OpenAI = OpenAICompatibleJudge<OpenAIConfig>;
