//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sitecal_domain::{CalendarFailure, SiteCalError};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::logging::error_label;

/// Standard API error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

/// Domain error surfaced through an HTTP handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub SiteCalError);

impl From<CalendarFailure> for AppError {
    fn from(failure: CalendarFailure) -> Self {
        Self(failure.into())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SiteCalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SiteCalError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteCalError::Auth(_) => StatusCode::UNAUTHORIZED,
            SiteCalError::Network(_) | SiteCalError::Provider(_) => StatusCode::BAD_GATEWAY,
            SiteCalError::Database(_) | SiteCalError::Config(_) | SiteCalError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let label = error_label(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, label, "Request failed");
        } else {
            warn!(error = %self.0, label, "Request rejected");
        }

        let body = Json(ErrorResponse { error: label, message: self.0.to_string() });
        (status, body).into_response()
    }
}
