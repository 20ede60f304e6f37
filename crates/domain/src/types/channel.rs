//! Push-notification channel records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::event::WatchRegistration;

/// An active push subscription against a remote calendar.
///
/// Created on registration and never mutated afterwards; renewal registers a
/// new channel instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub channel_id: String,
    pub calendar_id: String,
    pub resource_id: String,
    pub expiration: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl NotificationChannel {
    pub fn from_registration(
        calendar_id: &str,
        registration: WatchRegistration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id: registration.id,
            calendar_id: calendar_id.to_string(),
            resource_id: registration.resource_id,
            expiration: registration.expiration,
            created_at: now,
        }
    }

    /// Expired once `now` is past the expiration timestamp.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }
}
