use std::collections::BTreeMap;

use serde::Serialize;

use super::category::Category;

/// Justification used for every category when an evaluation could not be obtained.
pub const FAILURE_MARKER: &str = "Évaluation échouée";

/// Justification used when the evaluator omitted a category.
pub const MISSING_JUSTIFICATION: &str = "N/A";

/// Normalized score structure for one evaluation.
///
/// All five [`Category`] entries are always present in both maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    score_global: f64,
    scores: BTreeMap<Category, f64>,
    justifications: BTreeMap<Category, String>,
}

impl EvaluationResult {
    /// Builds a result from per-category lookups, filling gaps with `0` and
    /// [`MISSING_JUSTIFICATION`]. Without an explicit global score the mean of
    /// the category scores is used.
    pub fn from_parts<S, J>(score_global: Option<f64>, mut score: S, mut justification: J) -> Self
    where
        S: FnMut(Category) -> Option<f64>,
        J: FnMut(Category) -> Option<String>,
    {
        let scores: BTreeMap<Category, f64> = Category::ALL
            .iter()
            .map(|&c| (c, score(c).unwrap_or(0.0)))
            .collect();
        let justifications = Category::ALL
            .iter()
            .map(|&c| {
                (
                    c,
                    justification(c).unwrap_or_else(|| MISSING_JUSTIFICATION.to_string()),
                )
            })
            .collect();
        let score_global = score_global.unwrap_or_else(|| mean(scores.values().copied()));

        Self {
            score_global,
            scores,
            justifications,
        }
    }

    /// The all-zero result returned when evaluation failed.
    pub fn failed() -> Self {
        Self::from_parts(Some(0.0), |_| None, |_| Some(FAILURE_MARKER.to_string()))
    }

    pub fn score_global(&self) -> f64 {
        self.score_global
    }

    pub fn score(&self, category: Category) -> f64 {
        self.scores.get(&category).copied().unwrap_or(0.0)
    }

    pub fn justification(&self, category: Category) -> &str {
        self.justifications
            .get(&category)
            .map(String::as_str)
            .unwrap_or(MISSING_JUSTIFICATION)
    }

    pub fn scores(&self) -> &BTreeMap<Category, f64> {
        &self.scores
    }

    pub fn justifications(&self) -> &BTreeMap<Category, String> {
        &self.justifications
    }

    /// True when every justification carries [`FAILURE_MARKER`].
    pub fn is_failed(&self) -> bool {
        self.justifications.values().all(|j| j == FAILURE_MARKER)
    }
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self::failed()
    }
}

pub(super) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_is_all_zero_with_marker() {
        let result = EvaluationResult::failed();
        assert_eq!(result.score_global(), 0.0);
        for category in Category::ALL {
            assert_eq!(result.score(category), 0.0);
            assert_eq!(result.justification(category), FAILURE_MARKER);
        }
        assert!(result.is_failed());
    }

    #[test]
    fn serializes_with_category_keys() {
        let result = EvaluationResult::from_parts(
            Some(4.0),
            |c| (c == Category::DelaiLegal).then_some(8.0),
            |_| None,
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["score_global"], 4.0);
        assert_eq!(value["scores"]["delai_legal"], 8.0);
        assert_eq!(value["scores"]["impact_financier"], 0.0);
        assert_eq!(value["justifications"]["action_requise"], "N/A");
        assert!(!result.is_failed());
    }
}
