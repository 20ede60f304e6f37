//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use sitecal_domain::{ProviderError, SiteCalError};
use thiserror::Error;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub SiteCalError);

impl From<InfraError> for SiteCalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SiteCalError> for InfraError {
    fn from(value: SiteCalError) -> Self {
        InfraError(value)
    }
}

trait IntoSiteCalError {
    fn into_sitecal(self) -> SiteCalError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SiteCalError */
/* -------------------------------------------------------------------------- */

impl IntoSiteCalError for SqlError {
    fn into_sitecal(self) -> SiteCalError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => SiteCalError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        SiteCalError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        SiteCalError::Database(format!("unique constraint violation: {message}"))
                    }
                    _ => SiteCalError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SiteCalError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SiteCalError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                SiteCalError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => SiteCalError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => SiteCalError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_sitecal())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SiteCalError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(SiteCalError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SiteCalError */
/* -------------------------------------------------------------------------- */

impl IntoSiteCalError for HttpError {
    fn into_sitecal(self) -> SiteCalError {
        if self.is_timeout() {
            return SiteCalError::Network("HTTP request timed out".into());
        }
        if self.is_connect() {
            return SiteCalError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SiteCalError::Auth(message),
                404 => SiteCalError::NotFound(message),
                400..=499 if code != 429 => SiteCalError::InvalidInput(message),
                _ => SiteCalError::Network(message),
            };
        }

        SiteCalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_sitecal())
    }
}

/// Transport-level failure as seen by the calendar error classifier.
///
/// Timeouts and connection failures carry wording the classifier maps to
/// `network_error`.
pub(crate) fn transport_error(err: &HttpError) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::transport(format!("request timed out: {err}"));
    }
    if err.is_connect() {
        return ProviderError::transport(format!("network connection failed: {err}"));
    }
    ProviderError::new(err.status().map(|status| status.as_u16()), err.to_string())
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
