// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry for completion calls.

use std::future::Future;
use std::time::Duration;

use feedsense_config::model::ClassifierConfig;
use feedsense_core::FeedsenseError;
use tracing::warn;

use crate::error::ClassifyError;

/// How long to wait before the next attempt.
pub trait BackoffPolicy {
    /// `attempt` is the 1-based number of the attempt that just failed.
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// A fixed number of attempts with a constant pause between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl BackoffPolicy for RetryPolicy {
    fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

impl From<&ClassifierConfig> for RetryPolicy {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_secs(config.retry_delay_secs),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// At least one attempt is always made. No pause follows the final
    /// failure.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ClassifyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FeedsenseError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    return Err(ClassifyError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "completion attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
