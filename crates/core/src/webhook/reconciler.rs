//! Inbound webhook reconciler.
//!
//! Folds provider push notifications back into local schedule items.
//! Rejections (bad token, unparseable resource) are the only errors surfaced
//! to the HTTP caller; every failure after verification is logged and
//! acknowledged so the provider does not redeliver.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sitecal_domain::{RemoteEvent, ResourceState, ScheduleItem, WebhookNotification};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::ownership::ProjectInference;
use super::resource::{parse_resource_uri, EventResource};
use crate::calendar::ports::CalendarProvider;
use crate::schedule::ports::ScheduleItemRepository;

/// Why a notification was refused before any processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookRejection {
    #[error("channel token mismatch")]
    Unauthorized,

    #[error("unparseable resource uri: {0}")]
    BadRequest(String),

    /// No shared secret is configured, so nothing can be verified.
    #[error("webhook token is not configured")]
    Misconfigured,
}

/// What the reconciler did with an accepted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Subscription handshake acknowledged.
    Acknowledged,
    Created { id: Uuid },
    Updated { id: Uuid },
    /// Local record already matched the remote event and its sync state.
    Unchanged { id: Uuid },
    Deleted { removed: usize },
    /// `not_exists` for an event with no local record.
    NothingToDelete,
    Ignored { state: String },
    /// Fetch or write failed; logged and acknowledged.
    Failed { reason: String },
}

/// Applies push notifications to the local store.
pub struct WebhookReconciler {
    provider: Arc<dyn CalendarProvider>,
    repository: Arc<dyn ScheduleItemRepository>,
    inference: ProjectInference,
    channel_token: Option<String>,
}

impl WebhookReconciler {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        repository: Arc<dyn ScheduleItemRepository>,
        inference: ProjectInference,
        channel_token: Option<String>,
    ) -> Self {
        let channel_token = channel_token.filter(|token| !token.is_empty());
        Self { provider, repository, inference, channel_token }
    }

    /// Verify and apply one notification.
    #[instrument(
        skip(self, notification),
        fields(
            channel_id = notification.channel_id.as_deref().unwrap_or_default(),
            resource_state = notification.resource_state.as_deref().unwrap_or_default(),
        )
    )]
    pub async fn handle(
        &self,
        notification: &WebhookNotification,
    ) -> Result<ReconcileOutcome, WebhookRejection> {
        self.verify_token(notification)?;

        let state = notification.state();
        if state == ResourceState::Sync {
            info!("Push channel handshake acknowledged");
            return Ok(ReconcileOutcome::Acknowledged);
        }

        let raw_uri = notification.resource_uri.as_deref().unwrap_or_default();
        let Some(resource) = parse_resource_uri(raw_uri) else {
            warn!(resource_uri = raw_uri, "Rejecting notification with unparseable resource uri");
            return Err(WebhookRejection::BadRequest(raw_uri.to_string()));
        };

        let outcome = match state {
            ResourceState::Exists => self.reconcile_exists(&resource).await,
            ResourceState::NotExists => self.reconcile_not_exists(&resource).await,
            ResourceState::Sync => ReconcileOutcome::Acknowledged,
            ResourceState::Other(raw) => {
                info!(
                    calendar_id = %resource.calendar_id,
                    event_id = %resource.event_id,
                    state = %raw,
                    "Ignoring notification with unknown resource state"
                );
                ReconcileOutcome::Ignored { state: raw }
            }
        };
        Ok(outcome)
    }

    fn verify_token(&self, notification: &WebhookNotification) -> Result<(), WebhookRejection> {
        let Some(expected) = self.channel_token.as_deref() else {
            error!("Webhook received but no channel token is configured");
            return Err(WebhookRejection::Misconfigured);
        };
        match notification.channel_token.as_deref() {
            Some(token) if token == expected => Ok(()),
            _ => {
                warn!("Rejecting notification with invalid channel token");
                Err(WebhookRejection::Unauthorized)
            }
        }
    }

    async fn reconcile_exists(&self, resource: &EventResource) -> ReconcileOutcome {
        let EventResource { calendar_id, event_id } = resource;

        let event = match self.provider.get_event(calendar_id, event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                info!(%calendar_id, %event_id, "Remote event gone or cancelled, removing local copy");
                return self.reconcile_not_exists(resource).await;
            }
            Err(err) => {
                error!(
                    %calendar_id,
                    %event_id,
                    resource_state = "exists",
                    status = ?err.status,
                    error = %err,
                    "Failed to fetch remote event"
                );
                return ReconcileOutcome::Failed { reason: err.to_string() };
            }
        };

        match self.upsert(&event).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    %calendar_id,
                    %event_id,
                    resource_state = "exists",
                    error = %err,
                    "Failed to write reconciled schedule item"
                );
                ReconcileOutcome::Failed { reason: err.to_string() }
            }
        }
    }

    async fn upsert(&self, event: &RemoteEvent) -> sitecal_domain::Result<ReconcileOutcome> {
        if let Some(item) = self.repository.find_by_google_event_id(&event.id).await? {
            return self.converge(item, event).await;
        }

        let project_id = self.inference.infer(event);
        let item = ScheduleItem::from_remote(event, project_id, Utc::now());
        if let Err(err) = self.repository.insert(&item).await {
            // A concurrent delivery for the same event may have inserted first.
            let Some(existing) = self.repository.find_by_google_event_id(&event.id).await? else {
                return Err(err);
            };
            info!(event_id = %event.id, "Remote event stored by a concurrent notification");
            return self.converge(existing, event).await;
        }
        info!(
            id = %item.id,
            event_id = %event.id,
            calendar_id = %event.calendar_id,
            project_id = %item.project_id,
            "Created schedule item for externally created event"
        );
        Ok(ReconcileOutcome::Created { id: item.id })
    }

    async fn converge(
        &self,
        mut item: ScheduleItem,
        event: &RemoteEvent,
    ) -> sitecal_domain::Result<ReconcileOutcome> {
        if item.is_current_with(event) {
            info!(id = %item.id, event_id = %event.id, "Local schedule item already current");
            return Ok(ReconcileOutcome::Unchanged { id: item.id });
        }
        item.apply_remote(event, Utc::now());
        self.repository.update(&item).await?;
        info!(id = %item.id, event_id = %event.id, "Updated schedule item from remote event");
        Ok(ReconcileOutcome::Updated { id: item.id })
    }

    async fn reconcile_not_exists(&self, resource: &EventResource) -> ReconcileOutcome {
        let EventResource { calendar_id, event_id } = resource;

        match self.repository.delete_by_google_event_id(event_id).await {
            Ok(0) => {
                info!(%calendar_id, %event_id, "No local schedule item for removed event");
                ReconcileOutcome::NothingToDelete
            }
            Ok(removed) => {
                info!(%calendar_id, %event_id, removed, "Deleted schedule item for removed event");
                ReconcileOutcome::Deleted { removed }
            }
            Err(err) => {
                error!(
                    %calendar_id,
                    %event_id,
                    resource_state = "not_exists",
                    error = %err,
                    "Failed to delete schedule item"
                );
                ReconcileOutcome::Failed { reason: err.to_string() }
            }
        }
    }
}
