//! Provider error classification.
//!
//! HTTP status is authoritative when present; otherwise the message is
//! matched against keyword groups in table order. Anything unmatched is an
//! `ApiError` carrying the raw provider text.

use sitecal_domain::{CalendarErrorKind, CalendarFailure, ProviderError};

const NETWORK_KEYWORDS: &[&str] = &["network", "internet", "timeout", "timed out"];
const RATE_LIMIT_KEYWORDS: &[&str] = &["quota", "rate limit", "ratelimit", "rate_limit"];
const INVALID_KEYWORDS: &[&str] = &["invalid", "parameter"];
const AUTH_KEYWORDS: &[&str] = &["auth", "login", "permission"];

/// Classify a provider failure.
pub fn classify_error(error: &ProviderError) -> CalendarErrorKind {
    if let Some(kind) = error.status.and_then(classify_status) {
        return kind;
    }

    let message = error.message.to_ascii_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| message.contains(k));

    if mentions(NETWORK_KEYWORDS) {
        CalendarErrorKind::NetworkError
    } else if mentions(RATE_LIMIT_KEYWORDS) {
        CalendarErrorKind::RateLimit
    } else if mentions(INVALID_KEYWORDS) {
        CalendarErrorKind::InvalidParameters
    } else if mentions(AUTH_KEYWORDS) {
        CalendarErrorKind::AuthenticationRequired
    } else {
        CalendarErrorKind::ApiError
    }
}

fn classify_status(status: u16) -> Option<CalendarErrorKind> {
    match status {
        429 => Some(CalendarErrorKind::RateLimit),
        400 => Some(CalendarErrorKind::InvalidParameters),
        401 | 403 => Some(CalendarErrorKind::AuthenticationRequired),
        _ => None,
    }
}

/// Classify and wrap into the structured failure returned to callers.
pub fn to_failure(error: &ProviderError) -> CalendarFailure {
    CalendarFailure::new(classify_error(error), error.message.clone()).with_status(error.status)
}
