//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_wire_enum;

/// Main error type for SiteCal
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SiteCalError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calendar provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SiteCal operations
pub type Result<T> = std::result::Result<T, SiteCalError>;

/// Raw failure reported by a remote calendar adapter.
///
/// `status` is the HTTP status when the provider answered, `None` when the
/// request never produced a response (DNS, connect, timeout).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Provider answered with a non-success HTTP status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(Some(status), message)
    }

    /// Request failed before any response arrived.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// The remote resource no longer exists (404 / 410).
    #[must_use]
    pub fn is_gone(&self) -> bool {
        matches!(self.status, Some(404 | 410))
    }
}

/// Classification attached to every failed calendar operation.
///
/// Produced once at the point of first detection and carried unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarErrorKind {
    UserCancelled,
    AuthenticationRequired,
    InvalidParameters,
    NetworkError,
    RateLimit,
    ApiError,
}

impl_wire_enum!(CalendarErrorKind {
    UserCancelled => "user_cancelled",
    AuthenticationRequired => "authentication_required",
    InvalidParameters => "invalid_parameters",
    NetworkError => "network_error",
    RateLimit => "rate_limit",
    ApiError => "api_error",
});

impl CalendarErrorKind {
    /// Only transient classes are retried.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkError | Self::RateLimit)
    }

    /// Human-readable message shown to the user for this class.
    ///
    /// `ApiError` has no fixed text; callers pass the provider message through
    /// `CalendarFailure::new` and this value is only the fallback.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::UserCancelled => "Calendar sign-in was cancelled.",
            Self::AuthenticationRequired => {
                "Your calendar connection has expired. Please reconnect your account."
            }
            Self::InvalidParameters => "Invalid data for calendar event.",
            Self::NetworkError => "Unable to reach the calendar. Please check your internet connection.",
            Self::RateLimit => "Too many requests to the calendar. Please try again later.",
            Self::ApiError => "The calendar service reported an unexpected error.",
        }
    }
}

/// Structured failure returned across every public calendar operation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{reason}: {error}")]
pub struct CalendarFailure {
    pub reason: CalendarErrorKind,
    pub retryable: bool,
    /// Raw error text from the provider or validator.
    pub error: String,
    /// User-facing message for the notification.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl CalendarFailure {
    pub fn new(reason: CalendarErrorKind, error: impl Into<String>) -> Self {
        let error = error.into();
        let message = match reason {
            CalendarErrorKind::ApiError if !error.trim().is_empty() => error.clone(),
            other => other.user_message().to_string(),
        };
        Self { reason, retryable: reason.is_retryable(), error, message, status: None }
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub fn invalid_parameters(error: impl Into<String>) -> Self {
        Self::new(CalendarErrorKind::InvalidParameters, error)
    }

    pub fn user_cancelled() -> Self {
        Self::new(CalendarErrorKind::UserCancelled, "user declined calendar authentication")
    }
}

impl From<CalendarFailure> for SiteCalError {
    fn from(failure: CalendarFailure) -> Self {
        match failure.reason {
            CalendarErrorKind::InvalidParameters => Self::InvalidInput(failure.error),
            CalendarErrorKind::UserCancelled | CalendarErrorKind::AuthenticationRequired => {
                Self::Auth(failure.error)
            }
            CalendarErrorKind::NetworkError => Self::Network(failure.error),
            CalendarErrorKind::RateLimit | CalendarErrorKind::ApiError => {
                Self::Provider(failure.error)
            }
        }
    }
}
