//! Selection preview for the UI.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use sitecal_domain::{CalendarSelection, CalendarSelectionContext};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar/selection", post(preview))
}

/// POST /calendar/selection - which calendar and invites a context maps to
async fn preview(
    State(ctx): State<AppState>,
    Json(context): Json<CalendarSelectionContext>,
) -> Json<CalendarSelection> {
    Json(ctx.selector.select(&context))
}
