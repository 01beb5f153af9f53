use serde::Serialize;

/// Sampling settings for one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

/// Settings tried in order until an answer is not repetitive. The first rung
/// is near-greedy; later rungs loosen sampling to escape loops.
pub const SAMPLING_LADDER: [Sampling; 3] = [
    Sampling {
        temperature: 0.01,
        top_p: 0.9,
        repetition_penalty: 1.0,
    },
    Sampling {
        temperature: 0.1,
        top_p: 0.9,
        repetition_penalty: 1.0,
    },
    Sampling {
        temperature: 0.2,
        top_p: 0.95,
        repetition_penalty: 1.05,
    },
];
