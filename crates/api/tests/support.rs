#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use sitecal_api::{router, AppContext};
use sitecal_domain::{Config, RetrySettings};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const PROJECT_CAL: &str = "project-cal";
pub const WORK_ORDER_CAL: &str = "work-order-cal";
pub const WEBHOOK_TOKEN: &str = "shared-secret";

/// Running application wired to a mocked Google API and a temp database.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub google: MockServer,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let google = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temp dir should be created");

        let mut config = Config::default();
        config.database.path = temp_dir.path().join("api.db").to_string_lossy().into_owned();
        config.database.pool_size = 2;
        config.calendar.project_calendar_id = Some(PROJECT_CAL.into());
        config.calendar.work_order_calendar_id = Some(WORK_ORDER_CAL.into());
        config.calendar.adhoc_calendar_id = Some("primary".into());
        config.calendar.google_api_base = google.uri();
        config.calendar.access_token = Some("ya29.test".into());
        config.webhook.token = Some(WEBHOOK_TOKEN.into());
        config.webhook.url = Some("https://sitecal.example.com/webhooks/google-calendar".into());
        config.retry = RetrySettings { max_retries: 1, base_delay_ms: 1 };
        adjust(&mut config);

        let ctx = AppContext::new(config).await.expect("context should initialise");
        Self { ctx: Arc::new(ctx), google, _temp_dir: temp_dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        router(Arc::clone(&self.ctx)).oneshot(request).await.expect("router is infallible")
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response<Body> {
        self.send(json_request("POST", uri, body)).await
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
