use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::evaluation::{BatchSummary, EvaluationResult};
use crate::prompt::EvaluationRequest;

use super::judge::Evaluator;

/// Result of one case in a batch, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub index: usize,
    pub question: String,
    pub result: EvaluationResult,
}

/// Everything produced by a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub summary: BatchSummary,
    pub results: Vec<CaseResult>,
}

impl Evaluator {
    /// Evaluates `requests` with at most `concurrency` evaluations in flight.
    /// Results keep the input order.
    pub async fn evaluate_batch(
        &self,
        requests: &[EvaluationRequest],
        concurrency: usize,
    ) -> Vec<EvaluationResult> {
        stream::iter(requests)
            .map(|request| self.evaluate(request))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Runs a batch and assembles the report.
    pub async fn run_batch(
        &self,
        requests: &[EvaluationRequest],
        concurrency: usize,
        model: &str,
    ) -> BatchReport {
        let results = self.evaluate_batch(requests, concurrency).await;
        let summary = BatchSummary::from_results(&results);
        log::info!(
            "Evaluated {} cases ({} failed), mean score {:.2}",
            summary.evaluated,
            summary.failed,
            summary.mean_score_global
        );

        BatchReport {
            generated_at: Utc::now(),
            provider: self.provider_name().to_string(),
            model: model.to_string(),
            summary,
            results: requests
                .iter()
                .zip(results)
                .enumerate()
                .map(|(index, (request, result))| CaseResult {
                    index,
                    question: request.question.clone(),
                    result,
                })
                .collect(),
        }
    }
}
