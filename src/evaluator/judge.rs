use crate::{
    builder::JudgeBuilder,
    config::ProviderConfig,
    error::JudgeError,
    evaluation::{parse_evaluation, EvaluationResult},
    prompt::EvaluationRequest,
    provider::JudgeProvider,
    resilient::ResilienceConfig,
};

/// Scores candidate answers with an evaluator provider.
///
/// Each call formats the prompt, asks the provider (through whatever
/// wrappers it was built with) and parses the reply. Provider failures
/// degrade to [`EvaluationResult::failed`] so a batch is never aborted by
/// one bad evaluation.
pub struct Evaluator {
    provider: Box<dyn JudgeProvider>,
}

impl Evaluator {
    pub fn new(provider: Box<dyn JudgeProvider>) -> Self {
        Self { provider }
    }

    /// Builds a resilient provider for `config`.
    pub fn from_config(
        config: &ProviderConfig,
        resilience: &ResilienceConfig,
    ) -> Result<Self, JudgeError> {
        let provider = JudgeBuilder::from_config(config)
            .resilience_config(resilience)
            .build()?;
        Ok(Self::new(provider))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Evaluates one answer, surfacing provider errors.
    pub async fn try_evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, JudgeError> {
        let prompt = request.prompt();
        let raw = self.provider.judge(&prompt).await?;
        Ok(parse_evaluation(&raw))
    }

    /// Evaluates one answer. Never fails.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        match self.try_evaluate(request).await {
            Ok(result) => result,
            Err(err) => {
                log::error!(
                    "Error during evaluation with {}: {err}",
                    self.provider.name()
                );
                EvaluationResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Category;
    use crate::prompt::GroundTruth;
    use crate::resilient::ResilientJudge;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Scripted {
        replies: Mutex<Vec<Result<String, JudgeError>>>,
        prompts: Arc<Mutex<Vec<String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(mut replies: Vec<Result<String, JudgeError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                prompts: Arc::default(),
                calls: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl JudgeProvider for Scripted {
        async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(JudgeError::Generic("no reply scripted".into())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest::new(
            "Quel délai pour contester ?",
            "Deux mois.",
            GroundTruth {
                delai_legal: "2 mois".into(),
                ..GroundTruth::default()
            },
        )
    }

    #[tokio::test]
    async fn formats_prompt_and_parses_reply() {
        let provider = Scripted::new(vec![Ok(
            r#"{"scores": {"delai_legal": 10, "action_requise": 5}}"#.into(),
        )]);
        let prompts = provider.prompts.clone();
        let evaluator = Evaluator::new(Box::new(provider));

        let result = evaluator.evaluate(&request()).await;
        assert_eq!(result.score(Category::DelaiLegal), 10.0);
        assert_eq!(result.score_global(), 3.0);

        let sent = prompts.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Quel délai pour contester ?"));
        assert!(sent[0].contains("• Délai Legal: 2 mois"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_become_default_result() {
        let provider = Scripted::new(vec![
            Err(JudgeError::HttpError("502".into())),
            Err(JudgeError::HttpError("502".into())),
            Err(JudgeError::HttpError("502".into())),
        ]);
        let calls = provider.calls.clone();
        let evaluator = Evaluator::new(Box::new(ResilientJudge::new(
            Box::new(provider),
            ResilienceConfig::defaults(),
        )));

        let result = evaluator.evaluate(&request()).await;
        assert!(result.is_failed());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_then_success() {
        let provider = Scripted::new(vec![
            Err(JudgeError::HttpError("timeout".into())),
            Ok(r#"{"score_global": 9}"#.into()),
        ]);
        let evaluator = Evaluator::new(Box::new(ResilientJudge::new(
            Box::new(provider),
            ResilienceConfig::defaults(),
        )));

        let result = evaluator.try_evaluate(&request()).await.unwrap();
        assert_eq!(result.score_global(), 9.0);
    }

    #[tokio::test]
    async fn garbled_reply_is_not_an_error() {
        let provider = Scripted::new(vec![Ok("je ne peux pas répondre".into())]);
        let evaluator = Evaluator::new(Box::new(provider));

        let result = evaluator.try_evaluate(&request()).await.unwrap();
        assert!(result.is_failed());
    }
}
