use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::format::check_format;
use super::repetition::detect_repetition;
use super::sampling::{Sampling, SAMPLING_LADDER};
use crate::{
    backends::http,
    config::ConfigError,
    error::JudgeError,
    resilient::{self, ResilienceConfig},
    unwrap::{body_text, ANSWER_PROBES, CHAT_COMPLETION_PROBES},
};

pub const DEFAULT_CANDIDATE_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_SOLUTION_START_TAG: &str = "<|begin_of_solution|>";
pub const DEFAULT_SOLUTION_END_TAG: &str = "<|end_of_solution|>";
pub const DEFAULT_GENERATION_MAX_TOKENS: u32 = 8_000;
const MISTRAL_HOST: &str = "mistral.ai";

/// How the candidate model is prompted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Chat messages with the strict summary prompt and the sampling ladder.
    #[default]
    Chat,
    /// Raw ChatML prompt with forced reasoning, posted to `/generate`.
    Prompt,
}

impl std::str::FromStr for GenerationMode {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(GenerationMode::Chat),
            "prompt" | "generate" => Ok(GenerationMode::Prompt),
            _ => Err(JudgeError::InvalidRequest(format!(
                "Unknown generation mode: {s}"
            ))),
        }
    }
}

/// Markers around the final answer of a reasoning model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionTags {
    pub start: String,
    pub end: String,
}

impl Default for SolutionTags {
    fn default() -> Self {
        Self {
            start: DEFAULT_SOLUTION_START_TAG.to_string(),
            end: DEFAULT_SOLUTION_END_TAG.to_string(),
        }
    }
}

/// Where and how to reach the model under evaluation.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub mode: GenerationMode,
    /// Prompt mode only. `None` keeps the whole response.
    pub solution_tags: Option<SolutionTags>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    /// Bearer token, only sent to Mistral-hosted endpoints.
    pub api_key: Option<SecretString>,
    pub retry: ResilienceConfig,
}

impl GenerationConfig {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            mode: GenerationMode::default(),
            solution_tags: Some(SolutionTags::default()),
            max_tokens: DEFAULT_GENERATION_MAX_TOKENS,
            timeout_seconds: crate::backends::DEFAULT_TIMEOUT_SECONDS,
            api_key: None,
            retry: ResilienceConfig::defaults(),
        }
    }

    /// Reads `MODEL_ENDPOINT`, `MODEL_NAME`, `MISTRAL_MODEL_ID`,
    /// `MISTRAL_API_KEY`, `GENERATION_MODE`, `EXTRACT_SOLUTION_TAGS`,
    /// `SOLUTION_START_TAG` and `SOLUTION_END_TAG` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let endpoint = var("MODEL_ENDPOINT").ok_or(ConfigError::MissingGeneration {
            variable: "MODEL_ENDPOINT",
        })?;
        let model = var("MISTRAL_MODEL_ID")
            .filter(|_| endpoint.contains(MISTRAL_HOST))
            .or_else(|| var("MODEL_NAME"))
            .unwrap_or_else(|| DEFAULT_CANDIDATE_MODEL.to_string());

        let mut config = Self::new(endpoint, model);
        config.api_key = var("MISTRAL_API_KEY").map(SecretString::new);
        if let Some(mode) = var("GENERATION_MODE") {
            config.mode = mode.parse().unwrap_or_else(|_| {
                log::warn!("Unknown generation mode: {mode}, using chat");
                GenerationMode::Chat
            });
        }

        let extract = var("EXTRACT_SOLUTION_TAGS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);
        config.solution_tags = extract.then(|| {
            let defaults = SolutionTags::default();
            SolutionTags {
                start: var("SOLUTION_START_TAG").unwrap_or(defaults.start),
                end: var("SOLUTION_END_TAG").unwrap_or(defaults.end),
            }
        });
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Wire protocol spoken by the candidate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateApi {
    /// Self-hosted `/chat` endpoint taking HF-style sampling fields.
    Chat,
    /// Mistral chat completions.
    Mistral,
    /// Self-hosted `/generate` endpoint taking a raw prompt.
    Generate,
}

/// Maps a configured endpoint to the URL actually called.
///
/// In chat mode a `/generate` endpoint is swapped for its `/chat` sibling
/// and `/chat` is appended when missing. Mistral hosts always end in a
/// single `/chat/completions`. Prompt mode does the reverse and targets
/// `/generate`.
pub fn normalize_endpoint(endpoint: &str, mode: GenerationMode) -> (String, CandidateApi) {
    let base = endpoint.trim_end_matches('/');
    if mode == GenerationMode::Prompt {
        let url = if let Some(prefix) = base.strip_suffix("/chat") {
            format!("{prefix}/generate")
        } else if base.ends_with("/generate") {
            base.to_string()
        } else {
            format!("{base}/generate")
        };
        return (url, CandidateApi::Generate);
    }

    let chat = if let Some(prefix) = base.strip_suffix("/generate") {
        format!("{prefix}/chat")
    } else if base.ends_with("/chat") {
        base.to_string()
    } else {
        format!("{base}/chat")
    };

    if !chat.contains(MISTRAL_HOST) {
        return (chat, CandidateApi::Chat);
    }
    let root = chat.strip_suffix("/chat").unwrap_or(&chat);
    (format!("{root}/chat/completions"), CandidateApi::Mistral)
}

/// Prompt asking for an answer followed by the five-part structured summary.
pub fn candidate_prompt(question: &str) -> String {
    format!(
        r#"Tu es un expert juridique français spécialisé en droit des affaires et droit commercial.

Réponds à la question juridique ci-dessous, puis termine ta réponse par un résumé structuré avec ces 5 éléments:

• Action Requise: [décris l'action concrète nécessaire] parce que [référence légale précise]
• Délai Legal: [indique le délai précis] parce que [référence légale précise]
• Documents Obligatoires: [liste les documents nécessaires] parce que [référence légale précise]
• Impact Financier: [estime les coûts/frais] parce que [référence légale précise]
• Conséquences Non-Conformité: [explique les risques] parce que [référence légale précise]

Conseil: Utilise des références légales différentes pour chaque catégorie et sois précis dans tes explications.

Question: {question}"#
    )
}

/// ChatML prompt for reasoning models, opened on the assistant turn with
/// the reasoning marker already emitted.
pub fn reasoning_prompt(question: &str) -> String {
    let user_prompt = format!(
        r#"Tu es un expert juridique français spécialisé en droit des affaires et droit commercial.

ÉTAPE 1: Effectue d'abord une analyse complète avec tes tokens de raisonnement.

ÉTAPE 2: Après ton analyse, termine par ces 5 éléments dans cet ordre précis:
• Action Requise: [Action concrète à effectuer] parce que [référence légale précise avec numéro d'article]
• Délai Legal: [Timeframe ou délai applicable] parce que [référence légale précise avec numéro d'article]
• Documents Obligatoires: [Documents nécessaires] parce que [référence légale précise avec numéro d'article]
• Impact Financier: [Coûts, frais ou impact financier] parce que [référence légale précise avec numéro d'article]
• Conséquences Non-Conformité: [Risques en cas de non-respect] parce que [référence légale précise avec numéro d'article]

RÈGLES OBLIGATOIRES:
- Commence chaque ligne par "• [Catégorie]:"
- Termine chaque point par "parce que [justification légale]"
- Cite des articles précis (ex: "article 1193 du Code civil", "article L. 136-1 du Code de la consommation")
- Utilise des détails spécifiques (délais en jours/mois, types de documents, montants)

Question: {question}"#
    );
    format!(
        "<|im_start|>user\n{user_prompt}<|im_end|>\n\
         <|im_start|>assistant\n<|begin_of_reasoning|>\n"
    )
}

/// Returns the text between `start_tag` and `end_tag`, or from `start_tag`
/// to the end when the closing tag is absent. Falls back to the whole text.
pub fn extract_solution<'a>(text: &'a str, start_tag: &str, end_tag: &str) -> &'a str {
    let Some(start) = text.find(start_tag).map(|idx| idx + start_tag.len()) else {
        log::warn!("No solution tags found, using full response");
        return text;
    };
    match text.find(end_tag) {
        Some(end) if start < end => text[start..end].trim(),
        Some(end) => {
            log::warn!("Invalid tag positions: start_idx={start}, end_idx={end}");
            text
        }
        None => {
            log::info!("Only start tag found, extracting to end");
            text[start..].trim()
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum GenerationRequest<'a> {
    Mistral {
        model: &'a str,
        messages: Vec<ChatMessage<'a>>,
        max_tokens: u32,
        temperature: f32,
        stream: bool,
    },
    Chat {
        messages: Vec<ChatMessage<'a>>,
        stream: bool,
        max_new_tokens: u32,
        temperature: f32,
        top_p: f32,
        do_sample: bool,
        repetition_penalty: f32,
    },
    Prompt {
        prompt: &'a str,
        stream: bool,
        max_new_tokens: u32,
        temperature: f32,
    },
}

impl<'a> GenerationRequest<'a> {
    fn new(
        api: CandidateApi,
        model: &'a str,
        prompt: &'a str,
        max_tokens: u32,
        sampling: Sampling,
    ) -> Self {
        if api == CandidateApi::Generate {
            return GenerationRequest::Prompt {
                prompt,
                stream: false,
                max_new_tokens: max_tokens,
                temperature: sampling.temperature,
            };
        }
        let messages = vec![ChatMessage {
            role: "user",
            content: prompt,
        }];
        match api {
            CandidateApi::Mistral => GenerationRequest::Mistral {
                model,
                messages,
                max_tokens,
                temperature: sampling.temperature,
                stream: false,
            },
            CandidateApi::Chat | CandidateApi::Generate => GenerationRequest::Chat {
                messages,
                stream: false,
                max_new_tokens: max_tokens,
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                do_sample: true,
                repetition_penalty: sampling.repetition_penalty,
            },
        }
    }
}

/// Generates candidate answers, retrying on repetition and transient errors.
#[derive(Debug, Clone)]
pub struct CandidateClient {
    config: GenerationConfig,
    url: String,
    api: CandidateApi,
    client: Client,
}

impl CandidateClient {
    pub fn new(config: GenerationConfig) -> Result<Self, JudgeError> {
        let (url, api) = normalize_endpoint(&config.endpoint, config.mode);
        log::debug!("Candidate model endpoint: {url} ({api:?})");
        Ok(Self {
            client: http::build_client(Some(config.timeout_seconds))?,
            config,
            url,
            api,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api(&self) -> CandidateApi {
        self.api
    }

    /// Answers `question`.
    ///
    /// In chat mode each retry attempt walks the whole sampling ladder. In
    /// prompt mode a single near-greedy request is retried and the solution
    /// is cut out of the reasoning trace.
    pub async fn generate(&self, question: &str) -> Result<String, JudgeError> {
        if self.api == CandidateApi::Generate {
            return self.generate_from_prompt(question).await;
        }
        let prompt = candidate_prompt(question);
        resilient::retry(&self.config.retry, "Candidate generation", || {
            self.walk_ladder(&prompt)
        })
        .await
    }

    async fn generate_from_prompt(&self, question: &str) -> Result<String, JudgeError> {
        let prompt = reasoning_prompt(question);
        let raw = resilient::retry(&self.config.retry, "Candidate generation", || {
            self.request(&prompt, SAMPLING_LADDER[0])
        })
        .await?;
        log::info!("Raw response length: {} characters", raw.chars().count());

        Ok(match &self.config.solution_tags {
            Some(tags) => extract_solution(&raw, &tags.start, &tags.end).to_string(),
            None => raw,
        })
    }

    async fn walk_ladder(&self, prompt: &str) -> Result<String, JudgeError> {
        let last = SAMPLING_LADDER.len() - 1;
        let mut last_err = None;

        for (rung, sampling) in SAMPLING_LADDER.into_iter().enumerate() {
            let text = match self.request(prompt, sampling).await {
                Ok(text) => text,
                Err(err) if rung < last => {
                    log::warn!("Error on attempt {}: {err}, retrying...", rung + 1);
                    continue;
                }
                Err(err) => {
                    log::error!("Error generating response on final attempt: {err}");
                    last_err = Some(err);
                    break;
                }
            };

            if detect_repetition(&text).repetitive {
                if rung < last {
                    log::warn!(
                        "Repetition detected on attempt {}, retrying with adjusted parameters",
                        rung + 1
                    );
                    continue;
                }
                log::warn!("Repetition still detected on final attempt, returning response anyway");
            }

            let format = check_format(&text);
            if !format.missing.is_empty() {
                log::warn!("Missing format sections: {:?}", format.missing);
            }
            if !format.found.is_empty() {
                log::info!("Found format sections: {:?}", format.found);
            }
            return Ok(text);
        }

        Err(last_err
            .unwrap_or_else(|| JudgeError::Generic("empty sampling ladder".to_string())))
    }

    async fn request(&self, prompt: &str, sampling: Sampling) -> Result<String, JudgeError> {
        let body = GenerationRequest::new(
            self.api,
            &self.config.model,
            prompt,
            self.config.max_tokens,
            sampling,
        );
        http::trace_payload("Model", &body);

        let mut request = self.client.post(&self.url).json(&body);
        if self.api == CandidateApi::Mistral {
            if let Some(key) = &self.config.api_key {
                request = request.bearer_auth(key.expose_secret());
            }
        }

        let resp = request.send().await?;
        let raw = http::read_body("Model", resp).await?;
        let probes = match self.api {
            CandidateApi::Mistral => CHAT_COMPLETION_PROBES,
            CandidateApi::Chat | CandidateApi::Generate => ANSWER_PROBES,
        };
        Ok(body_text(&raw, probes).trim().to_string())
    }
}
