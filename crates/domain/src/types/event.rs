//! Remote calendar event payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content for a new remote event.
///
/// `start` is optional here so validation can reject it before any I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// Partial update for a remote event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
}

/// Canonical event as read back from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// Provider-side last modification time.
    pub updated: Option<DateTime<Utc>>,
}

impl RemoteEvent {
    /// Content fields equal those of a local record.
    #[must_use]
    pub fn matches(&self, item: &crate::types::schedule::ScheduleItem) -> bool {
        self.title == item.title
            && self.description == item.description
            && self.start == item.start_time
            && self.end == item.end_time
            && self.location == item.location
    }
}

/// Parameters for a push-notification subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRequest {
    pub channel_id: String,
    pub address: String,
    pub token: Option<String>,
}

/// What the provider returns for an accepted watch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRegistration {
    pub id: String,
    pub resource_id: String,
    pub expiration: DateTime<Utc>,
}
