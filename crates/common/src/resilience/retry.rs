//! Bounded retry loop driven by a caller-supplied policy.
//!
//! The executor runs an async operation, asks a [`RetryPolicy`] whether a
//! failure is worth another attempt and sleeps according to the
//! [`BackoffStrategy`] in between. Both terminal variants of [`RetryError`]
//! carry the error that ended the sequence.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Why a retried operation ultimately failed.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("All retry attempts exhausted after {attempts} tries: {last_error:?}")]
    AttemptsExhausted { attempts: u32, last_error: E },

    #[error("Operation failed with non-retryable error: {error:?}")]
    NonRetryable { error: E },
}

impl<E> RetryError<E> {
    /// The error from the final attempt.
    pub fn into_inner(self) -> E {
        match self {
            Self::AttemptsExhausted { last_error, .. } => last_error,
            Self::NonRetryable { error } => error,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AttemptsExhausted { .. })
    }
}

pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Result of a retry sequence plus what it cost.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    pub attempts: u32,
    pub total_delay: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }
}

/// Decides per failure whether another attempt is worthwhile.
pub trait RetryPolicy<E> {
    /// `attempt` is zero-based.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    Stop,
}

/// Exponential backoff: `initial_delay * base^attempt`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffStrategy {
    pub initial_delay: Duration,
    pub base: f64,
    pub max_delay: Duration,
}

impl BackoffStrategy {
    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay_ms = self.initial_delay.as_millis() as f64 * self.base.powi(exponent);
        let capped = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts including the first call. Zero is treated as one.
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

/// Runs operations under a [`RetryConfig`] and [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0_u32;
        let mut total_delay = Duration::ZERO;

        loop {
            attempts += 1;
            let error = match operation().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!(attempts, "Operation succeeded after retrying");
                    }
                    return RetryOutcome { result: Ok(value), attempts, total_delay };
                }
                Err(error) => error,
            };

            if self.policy.should_retry(&error, attempts - 1) == RetryDecision::Stop {
                debug!(attempts, ?error, "Not retrying");
                return RetryOutcome {
                    result: Err(RetryError::NonRetryable { error }),
                    attempts,
                    total_delay,
                };
            }

            if attempts >= max_attempts {
                warn!(attempts, ?error, "Retry attempts exhausted");
                return RetryOutcome {
                    result: Err(RetryError::AttemptsExhausted { attempts, last_error: error }),
                    attempts,
                    total_delay,
                };
            }

            let delay = self.config.backoff.calculate_delay(attempts - 1);
            warn!(attempts, ?delay, "Operation failed, retrying");
            tokio::time::sleep(delay).await;
            total_delay += delay;
        }
    }
}
