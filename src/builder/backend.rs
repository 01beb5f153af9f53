use crate::error::JudgeError;

/// Supported evaluator backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JudgeBackend {
    #[default]
    AzureOpenAI,
    OpenAI,
    Mistral,
    Claude,
    Gemini,
    Local,
}

impl JudgeBackend {
    /// Canonical name, as accepted by `EVALUATOR_PROVIDER`.
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeBackend::AzureOpenAI => "azure",
            JudgeBackend::OpenAI => "openai",
            JudgeBackend::Mistral => "mistral",
            JudgeBackend::Claude => "claude",
            JudgeBackend::Gemini => "gemini",
            JudgeBackend::Local => "local",
        }
    }

    /// Parses `name`, falling back to the default backend with a warning
    /// when the name is not recognised.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = Self::default();
            log::warn!(
                "Unknown evaluator provider: {name}, falling back to {}",
                fallback.as_str()
            );
            fallback
        })
    }
}

impl std::fmt::Display for JudgeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JudgeBackend {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "azure" | "azure-openai" | "azure_openai" => Ok(JudgeBackend::AzureOpenAI),
            "openai" => Ok(JudgeBackend::OpenAI),
            "mistral" => Ok(JudgeBackend::Mistral),
            "claude" | "anthropic" => Ok(JudgeBackend::Claude),
            "gemini" | "google" => Ok(JudgeBackend::Gemini),
            "local" => Ok(JudgeBackend::Local),
            _ => Err(JudgeError::InvalidRequest(format!(
                "Unknown evaluator backend: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("azure", JudgeBackend::AzureOpenAI)]
    #[case("OpenAI", JudgeBackend::OpenAI)]
    #[case("mistral", JudgeBackend::Mistral)]
    #[case("anthropic", JudgeBackend::Claude)]
    #[case("claude", JudgeBackend::Claude)]
    #[case(" gemini ", JudgeBackend::Gemini)]
    #[case("local", JudgeBackend::Local)]
    fn parses_known_names(#[case] name: &str, #[case] expected: JudgeBackend) {
        assert_eq!(name.parse::<JudgeBackend>().unwrap(), expected);
    }

    #[test]
    fn unknown_name_falls_back_to_azure() {
        assert!("cohere".parse::<JudgeBackend>().is_err());
        assert_eq!(JudgeBackend::parse_or_default("cohere"), JudgeBackend::AzureOpenAI);
    }
}
