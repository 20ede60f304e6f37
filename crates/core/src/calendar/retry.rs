//! Retry layer for remote calendar calls.
//!
//! Wraps a provider call in the common retry executor with a doubling
//! backoff. Only `NetworkError` and `RateLimit` failures are retried; the
//! terminal error is classified once and returned as a `CalendarFailure`.

use std::future::Future;
use std::time::Duration;

use sitecal_common::resilience::{
    BackoffStrategy, RetryConfig, RetryDecision, RetryExecutor, RetryPolicy,
};
use sitecal_domain::constants::RETRY_BACKOFF_FACTOR;
use sitecal_domain::{CalendarFailure, ProviderError, RetrySettings};
use tracing::{debug, warn};

use super::classification::{classify_error, to_failure};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Retries only the transient error classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifiedRetryPolicy;

impl RetryPolicy<ProviderError> for ClassifiedRetryPolicy {
    fn should_retry(&self, error: &ProviderError, attempt: u32) -> RetryDecision {
        let kind = classify_error(error);
        if kind.is_retryable() {
            debug!(%kind, attempt, "Retryable calendar error");
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

fn executor(settings: RetrySettings) -> RetryExecutor<ClassifiedRetryPolicy> {
    let config = RetryConfig {
        max_attempts: settings.total_attempts(),
        backoff: BackoffStrategy {
            initial_delay: settings.base_delay(),
            base: RETRY_BACKOFF_FACTOR,
            max_delay: MAX_BACKOFF,
        },
    };
    RetryExecutor::new(config, ClassifiedRetryPolicy)
}

/// Run `operation`, retrying transient failures up to `settings.max_retries`
/// times with delays of `base_delay * 2^n`.
pub async fn retry_with_backoff<F, Fut, T>(
    settings: RetrySettings,
    operation: F,
) -> Result<T, CalendarFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let outcome = executor(settings).execute_with_outcome(operation).await;
    let (attempts, total_delay) = (outcome.attempts, outcome.total_delay);

    outcome.into_result().map_err(|err| {
        let exhausted = err.is_exhausted();
        let provider_error = err.into_inner();
        let failure = to_failure(&provider_error);
        warn!(
            reason = %failure.reason,
            attempts,
            exhausted,
            ?total_delay,
            error = %provider_error,
            "Calendar call failed"
        );
        failure
    })
}
