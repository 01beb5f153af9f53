//! LLM-as-judge scoring of French business-law answers.
//!
//! A candidate answer is compared to a reference answer across five rubric
//! categories by an evaluator model. The crate formats the evaluator prompt,
//! talks to the configured provider with retries, and parses the loosely
//! structured reply into an [`EvaluationResult`]. It also ships the candidate
//! generation client used to produce the answers being judged.

pub mod backends;
pub mod builder;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod generation;
pub mod prompt;
pub mod provider;
pub mod resilient;
pub mod unwrap;

pub use builder::{JudgeBackend, JudgeBuilder};
pub use config::{ConfigError, ProviderConfig};
pub use error::JudgeError;
pub use evaluation::{parse_evaluation, BatchSummary, Category, EvaluationResult};
pub use evaluator::{BatchReport, Evaluator};
pub use prompt::{format_evaluation_prompt, EvaluationRequest, GroundTruth};
pub use provider::JudgeProvider;
pub use resilient::{ResilienceConfig, ResilientJudge};
pub use unwrap::response_text;
