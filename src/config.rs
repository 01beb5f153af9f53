//! Evaluator selection resolved from the environment.
//!
//! Resolution happens once at startup. The resulting [`ProviderConfig`] is
//! immutable and handed to [`crate::builder::JudgeBuilder::from_config`].

use secrecy::SecretString;

use crate::builder::JudgeBackend;

pub const PROVIDER_VAR: &str = "EVALUATOR_PROVIDER";
pub const MODEL_VAR: &str = "EVALUATOR_MODEL";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{variables} required for {provider} evaluator")]
    Missing {
        provider: &'static str,
        variables: String,
    },
    #[error("{variable} required for candidate generation")]
    MissingGeneration { variable: &'static str },
}

/// Evaluator backend together with the credential or endpoint it needs.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    AzureOpenAI {
        endpoint: String,
        api_key: SecretString,
        api_version: String,
        deployment: String,
        model: String,
    },
    OpenAI {
        api_key: SecretString,
        model: String,
    },
    Mistral {
        api_key: SecretString,
        model: String,
    },
    Claude {
        api_key: SecretString,
        model: String,
    },
    Gemini {
        api_key: SecretString,
        model: String,
    },
    Local {
        endpoint: String,
        model: String,
    },
}

impl ProviderConfig {
    /// Resolves the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let backend = var(PROVIDER_VAR)
            .map(|name| JudgeBackend::parse_or_default(&name))
            .unwrap_or_default();
        let model = var(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        log::info!(
            "Initializing evaluator with provider: {}, model: {model}",
            backend.as_str()
        );

        let first_of = |keys: &[&str]| keys.iter().find_map(|k| var(*k));
        let require = |provider: &'static str, keys: &[&str]| {
            first_of(keys).ok_or_else(|| ConfigError::Missing {
                provider,
                variables: keys.join(" or "),
            })
        };
        let secret = |provider: &'static str, keys: &[&str]| {
            require(provider, keys).map(SecretString::new)
        };

        let config = match backend {
            JudgeBackend::AzureOpenAI => ProviderConfig::AzureOpenAI {
                endpoint: require("Azure OpenAI", &["AZURE_OPENAI_ENDPOINT"])?,
                api_key: secret("Azure OpenAI", &["AZURE_OPENAI_API_KEY"])?,
                api_version: var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
                deployment: var("AZURE_OPENAI_DEPLOYMENT_NAME").unwrap_or_else(|| model.clone()),
                model,
            },
            JudgeBackend::OpenAI => ProviderConfig::OpenAI {
                api_key: secret("OpenAI", &["EVALUATOR_OPENAI_API_KEY", "OPENAI_API_KEY"])?,
                model,
            },
            JudgeBackend::Mistral => ProviderConfig::Mistral {
                api_key: secret("Mistral", &["EVALUATOR_MISTRAL_API_KEY", "MISTRAL_API_KEY"])?,
                model,
            },
            JudgeBackend::Claude => ProviderConfig::Claude {
                api_key: secret(
                    "Claude",
                    &["EVALUATOR_ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY"],
                )?,
                model,
            },
            JudgeBackend::Gemini => ProviderConfig::Gemini {
                api_key: secret("Gemini", &["EVALUATOR_GOOGLE_API_KEY", "GOOGLE_API_KEY"])?,
                model,
            },
            JudgeBackend::Local => ProviderConfig::Local {
                endpoint: require("local", &["EVALUATOR_ENDPOINT", "MODEL_ENDPOINT"])?,
                model,
            },
        };
        Ok(config)
    }

    pub fn backend(&self) -> JudgeBackend {
        match self {
            ProviderConfig::AzureOpenAI { .. } => JudgeBackend::AzureOpenAI,
            ProviderConfig::OpenAI { .. } => JudgeBackend::OpenAI,
            ProviderConfig::Mistral { .. } => JudgeBackend::Mistral,
            ProviderConfig::Claude { .. } => JudgeBackend::Claude,
            ProviderConfig::Gemini { .. } => JudgeBackend::Gemini,
            ProviderConfig::Local { .. } => JudgeBackend::Local,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::AzureOpenAI { model, .. }
            | ProviderConfig::OpenAI { model, .. }
            | ProviderConfig::Mistral { model, .. }
            | ProviderConfig::Claude { model, .. }
            | ProviderConfig::Gemini { model, .. }
            | ProviderConfig::Local { model, .. } => model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> Result<ProviderConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_to_azure_and_requires_its_credentials() {
        let err = resolve(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "AZURE_OPENAI_ENDPOINT required for Azure OpenAI evaluator"
        );

        let config = resolve(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "az"),
        ])
        .unwrap();
        match config {
            ProviderConfig::AzureOpenAI {
                deployment,
                api_version,
                model,
                ..
            } => {
                assert_eq!(model, DEFAULT_MODEL);
                assert_eq!(deployment, DEFAULT_MODEL);
                assert_eq!(api_version, DEFAULT_AZURE_API_VERSION);
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn evaluator_specific_key_wins_over_generic() {
        let config = resolve(&[
            ("EVALUATOR_PROVIDER", "mistral"),
            ("EVALUATOR_MISTRAL_API_KEY", "specific"),
            ("MISTRAL_API_KEY", "generic"),
        ])
        .unwrap();
        match config {
            ProviderConfig::Mistral { api_key, .. } => {
                assert_eq!(api_key.expose_secret(), "specific")
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn generic_key_is_the_fallback() {
        let config = resolve(&[
            ("EVALUATOR_PROVIDER", "claude"),
            ("EVALUATOR_MODEL", "claude-3-opus"),
            ("ANTHROPIC_API_KEY", "generic"),
        ])
        .unwrap();
        assert_eq!(config.backend(), JudgeBackend::Claude);
        assert_eq!(config.model(), "claude-3-opus");
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = resolve(&[("EVALUATOR_PROVIDER", "gemini"), ("GOOGLE_API_KEY", "")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "EVALUATOR_GOOGLE_API_KEY or GOOGLE_API_KEY required for Gemini evaluator"
        );
    }

    #[test]
    fn unknown_provider_falls_back_to_azure() {
        let config = resolve(&[
            ("EVALUATOR_PROVIDER", "watsonx"),
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "az"),
        ])
        .unwrap();
        assert_eq!(config.backend(), JudgeBackend::AzureOpenAI);
    }

    #[test]
    fn local_reads_model_endpoint() {
        let config = resolve(&[
            ("EVALUATOR_PROVIDER", "local"),
            ("MODEL_ENDPOINT", "http://gpu-box:8000"),
        ])
        .unwrap();
        match config {
            ProviderConfig::Local { endpoint, .. } => assert_eq!(endpoint, "http://gpu-box:8000"),
            other => panic!("unexpected config: {other:?}"),
        }
    }
}
