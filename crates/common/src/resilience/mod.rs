//! Resilience patterns for fault tolerance
//!
//! Generic over the error type: callers supply a [`RetryPolicy`] that decides
//! per error whether another attempt is worthwhile, and a [`RetryConfig`] that
//! bounds the number of attempts and the delay between them. The executor is
//! an explicit loop, so stack depth stays constant and dropping the returned
//! future cancels the sequence between attempts.

pub mod retry;

pub use retry::{
    BackoffStrategy, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryOutcome,
    RetryPolicy, RetryResult,
};
