use std::collections::BTreeMap;

use serde::Serialize;

use super::category::Category;
use super::result::{mean, EvaluationResult};

/// Aggregate figures over a batch of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub failed: usize,
    pub mean_score_global: f64,
    pub category_means: BTreeMap<Category, f64>,
}

impl BatchSummary {
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        let category_means = Category::ALL
            .iter()
            .map(|&c| (c, mean(results.iter().map(|r| r.score(c)))))
            .collect();

        Self {
            evaluated: results.len(),
            failed: results.iter().filter(|r| r.is_failed()).count(),
            mean_score_global: mean(results.iter().map(EvaluationResult::score_global)),
            category_means,
        }
    }
}
