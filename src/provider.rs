use async_trait::async_trait;

use crate::error::JudgeError;

/// An evaluator backend able to answer one evaluation prompt.
///
/// Implementations perform exactly one logical request per call and return
/// the raw text produced by the model. Retrying is left to
/// [`crate::resilient::ResilientJudge`].
#[async_trait]
pub trait JudgeProvider: Send + Sync {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError>;

    /// Short provider name used in logs and reports.
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: JudgeProvider + ?Sized> JudgeProvider for Box<P> {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        (**self).judge(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
