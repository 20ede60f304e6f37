//! Schedule items: bookable units of work tied to a project.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_EVENT_DURATION_MINUTES;
use crate::types::event::{CalendarEventDraft, CalendarEventPatch, RemoteEvent};

/// Locally persisted schedule record.
///
/// When `calendar_integration_enabled` is set and `sync_error` is empty, a
/// `google_event_id` is expected to appear eventually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: Uuid,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub calendar_id: Option<String>,
    /// Invitee emails chosen when the item was first targeted.
    #[serde(default)]
    pub attendees: Vec<String>,
    pub google_event_id: Option<String>,
    pub calendar_integration_enabled: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub sync_error: Option<String>,
}

impl ScheduleItem {
    /// Build an unpublished record from a creation request.
    pub fn from_new(new: NewScheduleItem, now: DateTime<Utc>) -> Self {
        let end_time = new.resolved_end();
        Self {
            id: Uuid::now_v7(),
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            start_time: new.start_time,
            end_time,
            location: new.location,
            calendar_id: None,
            attendees: Vec::new(),
            google_event_id: None,
            calendar_integration_enabled: new.calendar_integration_enabled,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
            last_synced_at: None,
            sync_error: None,
        }
    }

    /// Build a record for a remote event that has no local counterpart.
    ///
    /// Sync timestamps come from the provider's modification time so that
    /// replaying the same event yields the same record.
    pub fn from_remote(event: &RemoteEvent, project_id: String, now: DateTime<Utc>) -> Self {
        let synced_at = event.updated.unwrap_or(now);
        Self {
            id: Uuid::now_v7(),
            project_id,
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: event.start,
            end_time: event.end,
            location: event.location.clone(),
            calendar_id: Some(event.calendar_id.clone()),
            attendees: Vec::new(),
            google_event_id: Some(event.id.clone()),
            calendar_integration_enabled: true,
            created_by: None,
            created_at: now,
            updated_at: synced_at,
            last_synced_at: Some(synced_at),
            sync_error: None,
        }
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.google_event_id.is_some()
    }

    /// Integration is on but no remote id has been confirmed yet.
    #[must_use]
    pub fn needs_publish(&self) -> bool {
        self.calendar_integration_enabled && self.google_event_id.is_none()
    }

    /// Pin the target calendar and invitees before the first publish attempt.
    ///
    /// Later retries reuse them instead of re-running selection.
    pub fn target(&mut self, calendar_id: &str, attendees: Vec<String>) {
        self.calendar_id = Some(calendar_id.to_string());
        self.attendees = attendees;
    }

    /// Content, calendar and sync state already reflect `event`.
    #[must_use]
    pub fn is_current_with(&self, event: &RemoteEvent) -> bool {
        let synced = match event.updated {
            Some(updated) => self.last_synced_at == Some(updated),
            None => self.last_synced_at.is_some(),
        };
        event.matches(self)
            && self.calendar_id.as_deref() == Some(event.calendar_id.as_str())
            && self.sync_error.is_none()
            && synced
    }

    /// Fold the remote event's content fields into this record.
    ///
    /// Identity, ownership and creation metadata are left untouched.
    pub fn apply_remote(&mut self, event: &RemoteEvent, now: DateTime<Utc>) {
        let synced_at = event.updated.unwrap_or(now);
        self.title.clone_from(&event.title);
        self.description.clone_from(&event.description);
        self.start_time = event.start;
        self.end_time = event.end;
        self.location.clone_from(&event.location);
        self.calendar_id = Some(event.calendar_id.clone());
        self.last_synced_at = Some(synced_at);
        self.sync_error = None;
        self.updated_at = synced_at;
    }

    /// Record a confirmed remote publish.
    pub fn mark_synced(&mut self, calendar_id: &str, event_id: &str, now: DateTime<Utc>) {
        self.calendar_id = Some(calendar_id.to_string());
        self.google_event_id = Some(event_id.to_string());
        self.last_synced_at = Some(now);
        self.sync_error = None;
        self.updated_at = now;
    }

    pub fn mark_sync_failed(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.sync_error = Some(error.into());
        self.updated_at = now;
    }

    /// Remote payload for the current content and pinned invitees.
    pub fn to_draft(&self) -> CalendarEventDraft {
        CalendarEventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start: Some(self.start_time),
            end: Some(self.end_time),
            location: self.location.clone(),
            attendees: self.attendees.clone(),
        }
    }
}

/// Creation request for a schedule item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduleItem {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_integration_enabled")]
    pub calendar_integration_enabled: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

fn default_integration_enabled() -> bool {
    true
}

impl NewScheduleItem {
    /// End time, defaulting to a fixed duration after the start.
    #[must_use]
    pub fn resolved_end(&self) -> DateTime<Utc> {
        self.end_time
            .unwrap_or_else(|| self.start_time + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES))
    }
}

/// Partial update for a schedule item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl ScheduleItemPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.location.is_none()
    }

    pub fn apply_to(&self, item: &mut ScheduleItem, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            item.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(start) = self.start_time {
            item.start_time = start;
        }
        if let Some(end) = self.end_time {
            item.end_time = end;
        }
        if let Some(location) = &self.location {
            item.location = Some(location.clone());
        }
        item.updated_at = now;
    }

    /// Remote payload carrying only the changed fields.
    pub fn to_event_patch(&self) -> CalendarEventPatch {
        CalendarEventPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start_time,
            end: self.end_time,
            location: self.location.clone(),
            attendees: None,
        }
    }
}
