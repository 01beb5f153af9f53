//! Mistral judge. Mistral exposes the OpenAI request/response shape at its
//! own host, so only the constants differ.

use super::openai_compatible::{CompatibleConfig, OpenAICompatibleJudge};

pub struct MistralConfig;

impl CompatibleConfig for MistralConfig {
    const PROVIDER_NAME: &'static str = "Mistral";
    const DEFAULT_BASE_URL: &'static str = "https://api.mistral.ai/v1";
    const DEFAULT_MODEL: &'static str = "mistral-large-latest";
}

pub type Mistral = OpenAICompatibleJudge<MistralConfig>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::RequestParams;
    use crate::provider::JudgeProvider;

    #[test]
    fn defaults_point_at_mistral() {
        let judge = Mistral::new("key", None, None, RequestParams::default(), None).unwrap();
        assert_eq!(judge.base_url(), "https://api.mistral.ai/v1");
        assert_eq!(judge.model(), "mistral-large-latest");
        assert_eq!(judge.name(), "Mistral");
    }
}
