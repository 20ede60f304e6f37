//! Schedule item endpoints.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use sitecal_core::SyncReport;
use sitecal_domain::constants::DEFAULT_RESYNC_BATCH;
use sitecal_domain::{
    CalendarSelectionContext, EntityType, NewScheduleItem, ScheduleItem, ScheduleItemPatch,
};
use uuid::Uuid;

use super::AppState;
use crate::error::AppError;
use crate::utils::logging::log_calendar_operation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schedule-items", post(create))
        .route("/schedule-items/resync", post(resync))
        .route("/schedule-items/{id}", patch(update).delete(remove))
}

/// Request body for creating a schedule item
#[derive(Debug, Deserialize)]
pub struct CreateScheduleItemRequest {
    pub item: NewScheduleItem,
    /// Defaults to a schedule item linked to `item.project_id`.
    #[serde(default)]
    pub context: Option<CalendarSelectionContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResyncQuery {
    pub limit: Option<usize>,
}

/// POST /schedule-items
async fn create(
    State(ctx): State<AppState>,
    Json(req): Json<CreateScheduleItemRequest>,
) -> Result<(StatusCode, Json<ScheduleItem>), AppError> {
    let started = Instant::now();
    let context = req.context.unwrap_or_else(|| {
        CalendarSelectionContext::new(EntityType::ScheduleItem)
            .with_project(req.item.project_id.clone())
    });

    let result = ctx.schedule.create(req.item, &context).await;
    log_calendar_operation("schedule_items::create", started.elapsed(), result.is_ok());
    Ok((StatusCode::CREATED, Json(result?)))
}

/// PATCH /schedule-items/{id}
async fn update(
    State(ctx): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ScheduleItemPatch>,
) -> Result<Json<ScheduleItem>, AppError> {
    let started = Instant::now();
    let result = ctx.schedule.update(id, &patch).await;
    log_calendar_operation("schedule_items::update", started.elapsed(), result.is_ok());
    Ok(Json(result?))
}

/// DELETE /schedule-items/{id}
async fn remove(State(ctx): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    let started = Instant::now();
    let result = ctx.schedule.delete(id).await;
    log_calendar_operation("schedule_items::delete", started.elapsed(), result.is_ok());
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /schedule-items/resync?limit=N
async fn resync(
    State(ctx): State<AppState>,
    Query(query): Query<ResyncQuery>,
) -> Result<Json<SyncReport>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_RESYNC_BATCH);
    Ok(Json(ctx.schedule.resync_pending(limit).await?))
}
