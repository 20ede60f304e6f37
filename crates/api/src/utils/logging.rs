use std::time::Duration;

use sitecal_domain::{SiteCalError, UserNotice};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Log the outcome of a calendar-facing request with structured fields.
///
/// `operation` should be a stable identifier such as
/// `"schedule_items::create"`.
#[inline]
pub fn log_calendar_operation(operation: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(operation, duration_ms, "calendar_operation_success");
    } else {
        warn!(operation, duration_ms, "calendar_operation_failure");
    }
}

/// Convert a `SiteCalError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SiteCalError) -> &'static str {
    match error {
        SiteCalError::Database(_) => "database",
        SiteCalError::Config(_) => "config",
        SiteCalError::Network(_) => "network",
        SiteCalError::Auth(_) => "auth",
        SiteCalError::NotFound(_) => "not_found",
        SiteCalError::InvalidInput(_) => "invalid_input",
        SiteCalError::Provider(_) => "provider",
        SiteCalError::Internal(_) => "internal",
    }
}

/// Log every user notice published on `receiver` until the sender is gone.
pub fn spawn_notice_logger(mut receiver: broadcast::Receiver<UserNotice>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(notice) => warn!(
                    kind = notice.kind.as_str(),
                    operation = notice.operation.as_str(),
                    message = %notice.message,
                    "user_notice"
                ),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Notice logger lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
