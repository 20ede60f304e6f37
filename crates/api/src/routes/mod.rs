//! HTTP routes.

pub mod channels;
pub mod health;
pub mod schedule_items;
pub mod selection;
pub mod webhook;

use std::sync::Arc;

use axum::Router;

use crate::AppContext;

pub type AppState = Arc<AppContext>;

/// Full application router.
pub fn router(ctx: AppState) -> Router {
    Router::new()
        .merge(webhook::router())
        .merge(selection::router())
        .merge(schedule_items::router())
        .merge(channels::router())
        .merge(health::router())
        .with_state(ctx)
}
