//! Inbound push-notification endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use sitecal_core::WebhookRejection;
use sitecal_domain::WebhookNotification;

use super::AppState;

pub const CHANNEL_TOKEN_HEADER: &str = "x-goog-channel-token";
pub const CHANNEL_ID_HEADER: &str = "x-goog-channel-id";
pub const RESOURCE_ID_HEADER: &str = "x-goog-resource-id";
pub const RESOURCE_STATE_HEADER: &str = "x-goog-resource-state";
pub const RESOURCE_URI_HEADER: &str = "x-goog-resource-uri";

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/google-calendar", post(receive))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
}

/// Build a notification from the provider's `X-Goog-*` headers.
pub fn notification_from_headers(headers: &HeaderMap) -> WebhookNotification {
    WebhookNotification {
        channel_token: header(headers, CHANNEL_TOKEN_HEADER),
        channel_id: header(headers, CHANNEL_ID_HEADER),
        resource_id: header(headers, RESOURCE_ID_HEADER),
        resource_state: header(headers, RESOURCE_STATE_HEADER),
        resource_uri: header(headers, RESOURCE_URI_HEADER),
    }
}

/// POST /webhooks/google-calendar
///
/// 200 for handled or ignored notifications (including logged processing
/// failures), 401 for a bad token, 400 for an unparseable resource URI and
/// 500 when no webhook token is configured.
async fn receive(State(ctx): State<AppState>, headers: HeaderMap) -> Response {
    let notification = notification_from_headers(&headers);

    match ctx.reconciler.handle(&notification).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(rejection) => {
            let status = match rejection {
                WebhookRejection::Unauthorized => StatusCode::UNAUTHORIZED,
                WebhookRejection::BadRequest(_) => StatusCode::BAD_REQUEST,
                WebhookRejection::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": rejection.to_string() }))).into_response()
        }
    }
}
