use std::future::Future;

use tokio::time::sleep;

use crate::error::JudgeError;

use super::config::ResilienceConfig;

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. The last failure is returned unchanged.
///
/// Backoff sleeps only suspend the calling task.
pub async fn retry<F, Fut, T>(
    cfg: &ResilienceConfig,
    what: &str,
    mut op: F,
) -> Result<T, JudgeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, JudgeError>>,
{
    let mut attempts_left = cfg.max_attempts;
    let mut idx = 0usize;
    let mut last_err: Option<JudgeError> = None;

    while attempts_left > 0 {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempts_left == 1 || !err.is_retryable() {
                    return Err(err);
                }
                let delay = cfg.delay_for(idx);
                log::warn!(
                    "{what} attempt {} of {} failed: {err}; retrying in {delay:?}",
                    idx + 1,
                    cfg.max_attempts
                );
                last_err = Some(err);
                sleep(delay).await;
                attempts_left -= 1;
                idx += 1;
            }
        }
    }

    Err(JudgeError::RetryExceeded {
        attempts: cfg.max_attempts,
        last_error: last_err.map(|e| e.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let started = Instant::now();

        let result = retry(&ResilienceConfig::defaults(), "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(JudgeError::HttpError(format!("failure {n}")))
            } else {
                Ok("ok")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed().as_secs(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_last_failure_after_budget() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let cfg = ResilienceConfig::defaults();
        let result: Result<(), _> = retry(&cfg, "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(JudgeError::HttpError(format!("failure {n}")))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            JudgeError::HttpError(msg) => assert_eq!(msg, "failure 3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn auth_errors_stop_immediately() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let cfg = ResilienceConfig::defaults();
        let result: Result<(), _> = retry(&cfg, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(JudgeError::AuthError("401".into()))
        })
        .await;

        assert!(matches!(result, Err(JudgeError::AuthError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_reports_exhaustion() {
        let cfg = ResilienceConfig {
            max_attempts: 0,
            ..ResilienceConfig::defaults()
        };
        let result: Result<(), _> = retry(&cfg, "test", || async { Ok(()) }).await;
        assert!(matches!(result, Err(JudgeError::RetryExceeded { attempts: 0, .. })));
    }
}
