use crate::resilient::ResilienceConfig;

use super::judge_builder::JudgeBuilder;

impl JudgeBuilder {
    /// Enable the retry/backoff wrapper.
    pub fn resilient(mut self, enable: bool) -> Self {
        self.state.resilient_enable = Some(enable);
        self
    }

    /// Sets the number of attempts, first one included.
    pub fn resilient_attempts(mut self, attempts: usize) -> Self {
        self.state.resilient_attempts = Some(attempts);
        self
    }

    /// Sets min and max backoff delays in milliseconds.
    pub fn resilient_backoff(mut self, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.state.resilient_min_delay_ms = Some(min_delay_ms);
        self.state.resilient_max_delay_ms = Some(max_delay_ms);
        self
    }

    /// Sets the exponential base unit in milliseconds.
    pub fn resilient_multiplier(mut self, multiplier_ms: u64) -> Self {
        self.state.resilient_multiplier_ms = Some(multiplier_ms);
        self
    }

    /// Sets jitter toggle for backoff.
    pub fn resilient_jitter(mut self, jitter: bool) -> Self {
        self.state.resilient_jitter = Some(jitter);
        self
    }

    /// Applies every field of `cfg` and enables the wrapper.
    pub fn resilience_config(self, cfg: &ResilienceConfig) -> Self {
        self.resilient(true)
            .resilient_attempts(cfg.max_attempts)
            .resilient_backoff(cfg.min_delay_ms, cfg.max_delay_ms)
            .resilient_multiplier(cfg.multiplier_ms)
            .resilient_jitter(cfg.jitter)
    }
}
