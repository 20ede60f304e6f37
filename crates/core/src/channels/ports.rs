//! Port interfaces for push-notification channel persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sitecal_domain::{NotificationChannel, Result};

/// Append/upsert-only store keyed by channel id.
#[async_trait]
pub trait NotificationChannelRepository: Send + Sync {
    async fn upsert(&self, channel: &NotificationChannel) -> Result<()>;

    async fn find_by_id(&self, channel_id: &str) -> Result<Option<NotificationChannel>>;

    /// The channel with the latest expiration for a calendar.
    async fn latest_for_calendar(&self, calendar_id: &str) -> Result<Option<NotificationChannel>>;

    /// Channels whose expiration is before `now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<NotificationChannel>>;
}
