//! Client for the model under evaluation.
//!
//! Produces the candidate answers that the evaluator later scores. Kept apart
//! from the evaluator: nothing here is needed to judge an existing answer.

#[path = "generation/repetition.rs"]
mod repetition;

#[path = "generation/format.rs"]
mod format;

#[path = "generation/sampling.rs"]
mod sampling;

#[path = "generation/client.rs"]
mod client;

pub use client::{
    candidate_prompt, extract_solution, normalize_endpoint, reasoning_prompt, CandidateApi,
    CandidateClient, GenerationConfig, GenerationMode, SolutionTags,
};
pub use format::{check_format, FormatReport};
pub use repetition::{detect_repetition, RepetitionReport};
pub use sampling::{Sampling, SAMPLING_LADDER};
