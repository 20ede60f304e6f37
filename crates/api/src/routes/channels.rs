//! Push-channel registration endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use sitecal_domain::NotificationChannel;

use super::AppState;
use crate::error::AppError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/channels", post(register))
        .route("/channels/renew", post(renew))
}

#[derive(Debug, Deserialize)]
pub struct RegisterChannelRequest {
    pub calendar_id: String,
}

/// POST /channels
async fn register(
    State(ctx): State<AppState>,
    Json(req): Json<RegisterChannelRequest>,
) -> Result<(StatusCode, Json<NotificationChannel>), AppError> {
    let channel = ctx.channels.register(&req.calendar_id).await?;
    Ok((StatusCode::CREATED, Json(channel)))
}

/// POST /channels/renew - re-register calendars whose channel lapsed
async fn renew(State(ctx): State<AppState>) -> Result<Json<Vec<NotificationChannel>>, AppError> {
    Ok(Json(ctx.channels.renew_expired(Utc::now()).await?))
}
