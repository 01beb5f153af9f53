use async_trait::async_trait;

use crate::{error::JudgeError, provider::JudgeProvider};

use super::config::ResilienceConfig;
use super::retry::retry;

/// Resilient wrapper that retries transient judge failures using exponential backoff.
pub struct ResilientJudge {
    inner: Box<dyn JudgeProvider>,
    cfg: ResilienceConfig,
}

impl ResilientJudge {
    /// Creates a new resilient wrapper around an existing provider.
    pub fn new(inner: Box<dyn JudgeProvider>, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.cfg
    }
}

#[async_trait]
impl JudgeProvider for ResilientJudge {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        let what = format!("{} evaluation", self.inner.name());
        retry(&self.cfg, &what, || self.inner.judge(prompt)).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Flaky {
        calls: Arc<AtomicUsize>,
        failures: usize,
    }

    #[async_trait]
    impl JudgeProvider for Flaky {
        async fn judge(&self, _prompt: &str) -> Result<String, JudgeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(JudgeError::ProviderError("busy".into()))
            } else {
                Ok("{}".into())
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_inner_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let judge = ResilientJudge::new(
            Box::new(Flaky {
                calls: calls.clone(),
                failures: 2,
            }),
            ResilienceConfig::defaults(),
        );

        assert_eq!(judge.judge("p").await.unwrap(), "{}");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(judge.name(), "flaky");
    }
}
