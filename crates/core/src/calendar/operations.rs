//! Remote event operations.
//!
//! Every public operation returns `Result<_, CalendarFailure>` and never
//! propagates anything untagged. Order of checks per call:
//! 1. input validation (no I/O)
//! 2. authentication gate, offering interactive sign-in once
//! 3. provider call wrapped in the retry layer
//!
//! Each terminal failure produces exactly one user notice.

use std::sync::Arc;

use sitecal_domain::{
    CalendarErrorKind, CalendarEventDraft, CalendarEventPatch, CalendarFailure, CalendarOperation,
    RetrySettings, UserNotice,
};
use tracing::{info, instrument, warn};

use super::ports::{CalendarAuthGate, CalendarProvider, UserNotifier};
use super::retry::retry_with_backoff;

/// Create, update and delete events on behalf of an interactive user.
pub struct RemoteEventService {
    provider: Arc<dyn CalendarProvider>,
    auth: Arc<dyn CalendarAuthGate>,
    notifier: Arc<dyn UserNotifier>,
    retry: RetrySettings,
}

impl RemoteEventService {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        auth: Arc<dyn CalendarAuthGate>,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        Self { provider, auth, notifier, retry: RetrySettings::default() }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Create an event and return its remote id.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_event(
        &self,
        calendar_id: &str,
        draft: &CalendarEventDraft,
    ) -> Result<String, CalendarFailure> {
        let op = CalendarOperation::Create;
        let missing = if draft.title.trim().is_empty() {
            Some("event title is required")
        } else if draft.start.is_none() {
            Some("event start time is required")
        } else {
            None
        };
        if let Some(reason) = missing {
            return Err(self.fail(op, CalendarFailure::invalid_parameters(reason)));
        }
        self.ensure_authenticated(op).await?;

        let event_id = retry_with_backoff(self.retry, || {
            self.provider.create_event(calendar_id, draft)
        })
        .await
        .map_err(|failure| self.fail(op, failure))?;

        info!(event_id = %event_id, "Created calendar event");
        Ok(event_id)
    }

    /// Update an event; echoes back `event_id` on success.
    #[instrument(skip(self, patch))]
    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &CalendarEventPatch,
    ) -> Result<String, CalendarFailure> {
        let op = CalendarOperation::Update;
        if event_id.trim().is_empty() {
            return Err(self.fail(op, CalendarFailure::invalid_parameters("event id is required")));
        }
        self.ensure_authenticated(op).await?;

        retry_with_backoff(self.retry, || self.provider.update_event(calendar_id, event_id, patch))
            .await
            .map_err(|failure| self.fail(op, failure))?;

        info!("Updated calendar event");
        Ok(event_id.to_string())
    }

    /// Delete an event.
    ///
    /// An event the provider reports as already gone counts as deleted.
    #[instrument(skip(self))]
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<(), CalendarFailure> {
        let op = CalendarOperation::Delete;
        if event_id.trim().is_empty() {
            return Err(self.fail(op, CalendarFailure::invalid_parameters("event id is required")));
        }
        self.ensure_authenticated(op).await?;

        let result = retry_with_backoff(self.retry, || async move {
            match self.provider.delete_event(calendar_id, event_id).await {
                Err(err) if err.is_gone() => {
                    info!(status = ?err.status, "Calendar event already removed");
                    Ok(())
                }
                other => other,
            }
        })
        .await;

        result.map_err(|failure| self.fail(op, failure))?;
        info!("Deleted calendar event");
        Ok(())
    }

    async fn ensure_authenticated(&self, op: CalendarOperation) -> Result<(), CalendarFailure> {
        if self.auth.is_authenticated().await {
            return Ok(());
        }

        match self.auth.request_authentication().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(self.fail(op, CalendarFailure::user_cancelled())),
            Err(err) => Err(self.fail(
                op,
                CalendarFailure::new(CalendarErrorKind::AuthenticationRequired, err.to_string()),
            )),
        }
    }

    /// Surface the failure to the user and hand it back for returning.
    fn fail(&self, operation: CalendarOperation, failure: CalendarFailure) -> CalendarFailure {
        warn!(
            %operation,
            reason = %failure.reason,
            retryable = failure.retryable,
            error = %failure.error,
            "Calendar operation failed"
        );
        self.notifier.notify(UserNotice::from_failure(operation, &failure));
        failure
    }
}
