use crate::{ConfigError, ConfigErrorResult};

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

const MAX_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=10;
const INITIAL_DELAY_MS_RANGE: RangeInclusive<u64> = 10..=10_000;
const MAX_DELAY_MS_RANGE: RangeInclusive<u64> = 100..=60_000;
const BACKOFF_MULTIPLIER_RANGE: RangeInclusive<f64> = 1.0..=10.0;

/// Backoff for profile reads that fail transiently. `max_attempts`
/// counts the first try.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 2_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range("max_attempts", self.max_attempts, &MAX_ATTEMPTS_RANGE)?;
        check_range("initial_delay_ms", self.initial_delay_ms, &INITIAL_DELAY_MS_RANGE)?;
        check_range("max_delay_ms", self.max_delay_ms, &MAX_DELAY_MS_RANGE)?;
        check_range(
            "backoff_multiplier",
            self.backoff_multiplier,
            &BACKOFF_MULTIPLIER_RANGE,
        )?;

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(ConfigError::retry(format!(
                "retry.initial_delay_ms ({}) cannot exceed retry.max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            )));
        }

        Ok(())
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[track_caller]
fn check_range<T: PartialOrd + Display>(
    field: &str,
    value: T,
    range: &RangeInclusive<T>,
) -> ConfigErrorResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::retry(format!(
            "retry.{field} must be {}-{}, got {value}",
            range.start(),
            range.end()
        )))
    }
}
