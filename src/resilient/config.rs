use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::JudgeError;

/// Configuration for retry and backoff behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Maximum number of attempts including the first one
    pub max_attempts: usize,
    /// Lower bound of any backoff delay in milliseconds
    pub min_delay_ms: u64,
    /// Upper bound of any backoff delay in milliseconds
    pub max_delay_ms: u64,
    /// Exponential base unit in milliseconds
    pub multiplier_ms: u64,
    /// Whether to shave a deterministic jitter off each delay
    pub jitter: bool,
}

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_MIN_DELAY_MS: u64 = 4_000;
const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
const DEFAULT_MULTIPLIER_MS: u64 = 1_000;

/// Shortest backoff accepted by [`ResilienceConfig::validate`].
pub const BACKOFF_FLOOR_MS: u64 = 4_000;
/// Longest backoff accepted by [`ResilienceConfig::validate`].
pub const BACKOFF_CEILING_MS: u64 = 10_000;

impl ResilienceConfig {
    /// Three attempts, delays of `1s * 2^n` clamped to 4..=10 seconds.
    pub fn defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            multiplier_ms: DEFAULT_MULTIPLIER_MS,
            jitter: false,
        }
    }

    /// Delay to wait after the failed attempt with 0-based `attempt_index`.
    /// Jitter never takes the delay below `min_delay_ms`.
    pub fn delay_for(&self, attempt_index: usize) -> Duration {
        let floor = self.min_delay_ms.min(self.max_delay_ms);
        let mut delay = self
            .multiplier_ms
            .saturating_mul(1u64 << attempt_index.min(16))
            .clamp(floor, self.max_delay_ms);
        if self.jitter {
            let span = (delay / 2).max(1);
            let jitter = ((attempt_index as u64)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1))
                % span;
            delay = delay.saturating_sub(jitter).max(floor);
        }
        Duration::from_millis(delay)
    }
}

impl ResilienceConfig {
    /// Checks user-supplied settings: at least one attempt and backoff
    /// bounds inside 4..=10 seconds.
    pub fn validate(&self) -> Result<(), JudgeError> {
        if self.max_attempts == 0 {
            return Err(JudgeError::InvalidRequest(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.min_delay_ms < BACKOFF_FLOOR_MS || self.max_delay_ms > BACKOFF_CEILING_MS {
            return Err(JudgeError::InvalidRequest(format!(
                "backoff must stay within {BACKOFF_FLOOR_MS}..={BACKOFF_CEILING_MS} ms, \
                 got {}..={}",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(JudgeError::InvalidRequest(format!(
                "min_delay_ms {} exceeds max_delay_ms {}",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delay_is_clamped() {
        let cfg = ResilienceConfig::defaults();
        let delays: Vec<u64> = (0..6).map(|i| cfg.delay_for(i).as_secs()).collect();
        assert_eq!(delays, vec![4, 4, 4, 8, 10, 10]);
    }

    #[test]
    fn jitter_never_exceeds_base_delay() {
        let cfg = ResilienceConfig {
            jitter: true,
            ..ResilienceConfig::defaults()
        };
        for i in 0..5 {
            assert!(cfg.delay_for(i) <= ResilienceConfig::defaults().delay_for(i));
            assert!(cfg.delay_for(i) >= Duration::from_millis(cfg.min_delay_ms));
        }
    }

    #[test]
    fn jitter_respects_min_delay() {
        let cfg = ResilienceConfig {
            jitter: true,
            min_delay_ms: 4_000,
            max_delay_ms: 4_000,
            ..ResilienceConfig::defaults()
        };
        for i in 0..8 {
            assert_eq!(cfg.delay_for(i), Duration::from_millis(4_000));
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ResilienceConfig::defaults().validate().is_ok());
    }

    #[test]
    fn rejects_backoff_outside_window() {
        let no_backoff = ResilienceConfig {
            min_delay_ms: 0,
            ..ResilienceConfig::defaults()
        };
        assert!(matches!(
            no_backoff.validate(),
            Err(JudgeError::InvalidRequest(_))
        ));

        let too_long = ResilienceConfig {
            max_delay_ms: 60_000,
            ..ResilienceConfig::defaults()
        };
        assert!(too_long.validate().is_err());

        let inverted = ResilienceConfig {
            min_delay_ms: 9_000,
            max_delay_ms: 5_000,
            ..ResilienceConfig::defaults()
        };
        assert!(inverted.validate().is_err());

        let no_attempts = ResilienceConfig {
            max_attempts: 0,
            ..ResilienceConfig::defaults()
        };
        assert!(no_attempts.validate().is_err());
    }
}
