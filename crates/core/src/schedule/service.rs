//! Schedule item lifecycle with remote calendar publishing.
//!
//! For every mutation the remote call happens first and the local write
//! second, so a stored `google_event_id` always names an event the provider
//! accepted. A failed remote create still stores the row, tagged with
//! `sync_error` and pinned to the selected calendar and invitees, and
//! `resync_pending` retries it later against the same target. A declined
//! sign-in aborts the operation before any local write.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitecal_domain::{
    CalendarErrorKind, CalendarFailure, CalendarSelectionContext, EntityType, NewScheduleItem,
    Result, ScheduleItem, ScheduleItemPatch, SiteCalError,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::ports::ScheduleItemRepository;
use crate::calendar::{CalendarSelector, RemoteEventService};

/// Counts from one `resync_pending` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub attempted: usize,
    pub published: usize,
    pub failed: usize,
}

pub struct ScheduleSyncService {
    selector: CalendarSelector,
    events: Arc<RemoteEventService>,
    repository: Arc<dyn ScheduleItemRepository>,
}

impl ScheduleSyncService {
    pub fn new(
        selector: CalendarSelector,
        events: Arc<RemoteEventService>,
        repository: Arc<dyn ScheduleItemRepository>,
    ) -> Self {
        Self { selector, events, repository }
    }

    /// Create a schedule item and publish it to the selected calendar.
    ///
    /// The local row is written whether or not the remote create succeeded,
    /// unless the user declined sign-in, which returns the failure and
    /// stores nothing.
    #[instrument(skip(self, new, context), fields(project_id = %new.project_id))]
    pub async fn create(
        &self,
        new: NewScheduleItem,
        context: &CalendarSelectionContext,
    ) -> Result<ScheduleItem> {
        if new.title.trim().is_empty() {
            return Err(SiteCalError::InvalidInput("title is required".into()));
        }
        if new.end_time.is_some_and(|end| end < new.start_time) {
            return Err(SiteCalError::InvalidInput("end_time precedes start_time".into()));
        }

        let mut item = ScheduleItem::from_new(new, Utc::now());
        if item.calendar_integration_enabled {
            let selection = self.selector.select(context);
            item.target(&selection.primary.id, selection.attendee_emails());
            if let Err(failure) = self.publish(&mut item).await {
                if is_cancelled(&failure) {
                    info!("Sign-in declined, schedule item not stored");
                    return Err(failure.into());
                }
            }
        }

        self.repository.insert(&item).await?;
        info!(
            id = %item.id,
            google_event_id = item.google_event_id.as_deref().unwrap_or_default(),
            sync_error = item.sync_error.is_some(),
            "Stored schedule item"
        );
        Ok(item)
    }

    /// Apply a patch remotely (when published) and locally.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: &ScheduleItemPatch) -> Result<ScheduleItem> {
        let mut item = self.load(id).await?;
        if patch.is_empty() {
            return Ok(item);
        }

        let now = Utc::now();
        patch.apply_to(&mut item, now);
        if item.end_time < item.start_time {
            return Err(SiteCalError::InvalidInput("end_time precedes start_time".into()));
        }

        if let (Some(calendar_id), Some(event_id)) =
            (item.calendar_id.clone(), item.google_event_id.clone())
        {
            match self.events.update_event(&calendar_id, &event_id, &patch.to_event_patch()).await {
                Ok(_) => item.mark_synced(&calendar_id, &event_id, now),
                Err(failure) if is_cancelled(&failure) => return Err(failure.into()),
                Err(failure) => {
                    warn!(id = %item.id, reason = %failure.reason, "Remote update failed");
                    item.mark_sync_failed(failure.to_string(), now);
                }
            }
        }

        self.repository.update(&item).await?;
        Ok(item)
    }

    /// Remove the remote event (when published) and then the local row.
    ///
    /// A remote failure keeps the row, records the error on it and is
    /// returned to the caller. A declined sign-in leaves the row untouched.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut item = self.load(id).await?;

        if let (Some(calendar_id), Some(event_id)) =
            (item.calendar_id.clone(), item.google_event_id.clone())
        {
            if let Err(failure) = self.events.delete_event(&calendar_id, &event_id).await {
                if is_cancelled(&failure) {
                    return Err(failure.into());
                }
                item.mark_sync_failed(failure.to_string(), Utc::now());
                self.repository.update(&item).await?;
                return Err(failure.into());
            }
        }

        self.repository.delete(id).await?;
        info!(%id, "Deleted schedule item");
        Ok(())
    }

    /// Publish up to `limit` integration-enabled items that still lack a
    /// remote event id.
    ///
    /// Items go to the calendar and invitees pinned at creation. Rows with no
    /// pinned calendar fall back to a project schedule selection. A declined
    /// sign-in ends the pass without touching the remaining rows.
    #[instrument(skip(self))]
    pub async fn resync_pending(&self, limit: usize) -> Result<SyncReport> {
        let pending = self.repository.list_unpublished(limit).await?;
        let mut report = SyncReport::default();

        for mut item in pending {
            if item.calendar_id.is_none() {
                let context = CalendarSelectionContext::new(EntityType::ScheduleItem)
                    .with_project(item.project_id.clone());
                let selection = self.selector.select(&context);
                item.target(&selection.primary.id, selection.attendee_emails());
            }

            report.attempted += 1;
            match self.publish(&mut item).await {
                Ok(()) => report.published += 1,
                Err(failure) if is_cancelled(&failure) => {
                    report.failed += 1;
                    warn!("Sign-in declined, stopping resync pass");
                    break;
                }
                Err(_) => report.failed += 1,
            }
            self.repository.update(&item).await?;
        }

        info!(
            attempted = report.attempted,
            published = report.published,
            failed = report.failed,
            "Resync pass finished"
        );
        Ok(report)
    }

    async fn load(&self, id: Uuid) -> Result<ScheduleItem> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| SiteCalError::NotFound(format!("schedule item {id}")))
    }

    /// Create the remote event on the item's pinned calendar.
    ///
    /// Records the outcome on the item, except for a declined sign-in.
    async fn publish(&self, item: &mut ScheduleItem) -> std::result::Result<(), CalendarFailure> {
        let Some(calendar_id) = item.calendar_id.clone() else {
            return Err(CalendarFailure::invalid_parameters("no target calendar"));
        };
        let now = Utc::now();

        match self.events.create_event(&calendar_id, &item.to_draft()).await {
            Ok(event_id) => {
                item.mark_synced(&calendar_id, &event_id, now);
                Ok(())
            }
            Err(failure) => {
                if !is_cancelled(&failure) {
                    warn!(id = %item.id, reason = %failure.reason, "Remote create failed");
                    item.mark_sync_failed(failure.to_string(), now);
                }
                Err(failure)
            }
        }
    }
}

fn is_cancelled(failure: &CalendarFailure) -> bool {
    failure.reason == CalendarErrorKind::UserCancelled
}
