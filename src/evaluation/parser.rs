//! Turns raw evaluator text into an [`EvaluationResult`].
//!
//! Evaluators are asked for a bare JSON object but routinely wrap it in
//! prose or code fences, drop categories, or omit the global score. Parsing
//! never fails outward: unusable text yields [`EvaluationResult::failed`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::category::Category;
use super::result::EvaluationResult;

fn embedded_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

/// Parses evaluator output, repairing what can be repaired.
pub fn parse_evaluation(raw: &str) -> EvaluationResult {
    match parse_object(raw) {
        Some(object) => from_object(&object),
        None => {
            log::error!("Failed to parse evaluation JSON: {raw}");
            EvaluationResult::failed()
        }
    }
}

fn candidate_json(raw: &str) -> Option<&str> {
    let text = raw.trim();
    if text.starts_with('{') {
        return Some(text);
    }
    embedded_object().find(text).map(|m| m.as_str())
}

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let candidate = candidate_json(raw)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            log::error!("Evaluation JSON is not an object: {other}");
            None
        }
        Err(err) => {
            log::error!("JSON decode error: {err}");
            None
        }
    }
}

fn from_object(object: &Map<String, Value>) -> EvaluationResult {
    let empty = Map::new();
    let scores = section(object, "scores").unwrap_or(&empty);
    let justifications = section(object, "justifications").unwrap_or(&empty);
    let score_global = object
        .get("score_global")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite());

    EvaluationResult::from_parts(
        score_global,
        |c| scores.get(c.key()).map(score_value),
        |c| justifications.get(c.key()).and_then(justification_value),
    )
}

fn section<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    object.get(key).and_then(Value::as_object)
}

/// Non-numeric and non-finite values count as 0.
fn score_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn justification_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{FAILURE_MARKER, MISSING_JUSTIFICATION};
    use proptest::prelude::*;

    #[test]
    fn extracts_object_embedded_in_prose() {
        let result = parse_evaluation("blah blah {\"scores\":{\"action_requise\":5}} blah");
        assert_eq!(result.score(Category::ActionRequise), 5.0);
        for category in &Category::ALL[1..] {
            assert_eq!(result.score(*category), 0.0);
        }
        assert_eq!(result.score_global(), 1.0);
    }

    #[test]
    fn keeps_complete_evaluation() {
        let raw = r#"
        {
            "score_global": 72,
            "scores": {
                "action_requise": 80,
                "delai_legal": 70,
                "documents_obligatoires": 60,
                "impact_financier": 75,
                "consequences_non_conformite": 75
            },
            "justifications": {
                "action_requise": "Action correcte",
                "delai_legal": "Délai approximatif",
                "documents_obligatoires": "Liste incomplète",
                "impact_financier": "Correct",
                "consequences_non_conformite": "Correct"
            }
        }"#;
        let result = parse_evaluation(raw);
        assert_eq!(result.score_global(), 72.0);
        assert_eq!(result.score(Category::DocumentsObligatoires), 60.0);
        assert_eq!(result.justification(Category::DelaiLegal), "Délai approximatif");
    }

    #[test]
    fn fenced_json_is_recovered() {
        let raw = "```json\n{\"score_global\": 3, \"scores\": {\"delai_legal\": 3}}\n```";
        let result = parse_evaluation(raw);
        assert_eq!(result.score_global(), 3.0);
        assert_eq!(result.score(Category::DelaiLegal), 3.0);
        assert_eq!(
            result.justification(Category::DelaiLegal),
            MISSING_JUSTIFICATION
        );
    }

    #[test]
    fn non_numeric_global_score_is_recomputed() {
        let raw =
            r#"{"score_global": "high", "scores": {"action_requise": 10, "delai_legal": "5"}}"#;
        let result = parse_evaluation(raw);
        assert_eq!(result.score(Category::DelaiLegal), 5.0);
        assert_eq!(result.score_global(), 3.0);
    }

    #[test]
    fn non_finite_string_scores_count_as_zero() {
        let raw = serde_json::json!({
            "scores": {
                "action_requise": "NaN",
                "delai_legal": 10,
                "impact_financier": "inf",
                "documents_obligatoires": "-infinity"
            }
        })
        .to_string();
        let result = parse_evaluation(&raw);
        assert_eq!(result.score(Category::ActionRequise), 0.0);
        assert_eq!(result.score(Category::ImpactFinancier), 0.0);
        assert_eq!(result.score(Category::DocumentsObligatoires), 0.0);
        assert_eq!(result.score_global(), 2.0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score_global"], 2.0);
        assert_eq!(json["scores"]["action_requise"], 0.0);
    }

    #[test]
    fn non_finite_global_score_is_recomputed() {
        let result = parse_evaluation(r#"{"score_global": "NaN", "scores": {"delai_legal": 50}}"#);
        assert_eq!(result.score_global(), 10.0);
    }

    #[test]
    fn non_object_sections_are_treated_as_empty() {
        let result = parse_evaluation(r#"{"scores": [1, 2], "justifications": "none"}"#);
        assert_eq!(result.score_global(), 0.0);
        assert_eq!(
            result.justification(Category::ImpactFinancier),
            MISSING_JUSTIFICATION
        );
        assert!(!result.is_failed());
    }

    #[test]
    fn garbage_yields_failed_result() {
        for raw in ["", "no braces here", "{not json}", "{\"scores\": {", "[1, 2, 3]"] {
            let result = parse_evaluation(raw);
            assert!(result.is_failed(), "input {raw:?} should fail");
            assert_eq!(result.justification(Category::ActionRequise), FAILURE_MARKER);
            assert_eq!(result.score_global(), 0.0);
        }
    }

    proptest! {
        #[test]
        fn missing_global_score_is_mean_of_categories(
            values in prop::collection::vec(0u32..=100, 5),
        ) {
            let scores: Map<String, Value> = Category::ALL
                .iter()
                .zip(&values)
                .map(|(c, v)| (c.key().to_string(), Value::from(*v)))
                .collect();
            let raw = serde_json::json!({ "scores": scores }).to_string();
            let result = parse_evaluation(&raw);
            let expected = values.iter().map(|v| f64::from(*v)).sum::<f64>() / 5.0;
            prop_assert!((result.score_global() - expected).abs() < 1e-9);
        }

        #[test]
        fn absent_categories_are_defaulted(mask in prop::collection::vec(any::<bool>(), 5)) {
            let scores: Map<String, Value> = Category::ALL
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(c, _)| (c.key().to_string(), Value::from(7)))
                .collect();
            let raw = serde_json::json!({ "scores": scores }).to_string();
            let result = parse_evaluation(&raw);
            for (category, kept) in Category::ALL.iter().zip(&mask) {
                let expected = if *kept { 7.0 } else { 0.0 };
                prop_assert_eq!(result.score(*category), expected);
                prop_assert_eq!(result.justification(*category), MISSING_JUSTIFICATION);
            }
        }

        #[test]
        fn arbitrary_text_never_panics(raw in ".{0,200}") {
            let result = parse_evaluation(&raw);
            prop_assert_eq!(result.scores().len(), 5);
            prop_assert_eq!(result.justifications().len(), 5);
            prop_assert!(result.score_global().is_finite());
        }

        #[test]
        fn string_scores_never_yield_non_finite_global(
            values in prop::collection::vec(
                prop_oneof![
                    Just("NaN".to_string()),
                    Just("inf".to_string()),
                    Just("-Infinity".to_string()),
                    (0u32..=100).prop_map(|v| v.to_string()),
                    ".{0,8}",
                ],
                5,
            ),
        ) {
            let scores: Map<String, Value> = Category::ALL
                .iter()
                .zip(&values)
                .map(|(c, v)| (c.key().to_string(), Value::from(v.as_str())))
                .collect();
            let raw = serde_json::json!({ "scores": scores }).to_string();
            let result = parse_evaluation(&raw);
            prop_assert!(result.score_global().is_finite());
            for category in Category::ALL {
                prop_assert!(result.score(category).is_finite());
            }
        }
    }
}
