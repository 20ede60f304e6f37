//! Registers and renews push channels against remote calendars.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sitecal_domain::{NotificationChannel, Result, RetrySettings, SiteCalError, WatchRequest};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::ports::NotificationChannelRepository;
use crate::calendar::ports::CalendarProvider;
use crate::calendar::retry_with_backoff;

pub struct ChannelRegistrar {
    provider: Arc<dyn CalendarProvider>,
    repository: Arc<dyn NotificationChannelRepository>,
    webhook_url: Option<String>,
    channel_token: Option<String>,
    retry: RetrySettings,
}

impl ChannelRegistrar {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        repository: Arc<dyn NotificationChannelRepository>,
        webhook_url: Option<String>,
        channel_token: Option<String>,
    ) -> Self {
        Self {
            provider,
            repository,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            channel_token,
            retry: RetrySettings::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Subscribe to push notifications for `calendar_id` under a fresh
    /// channel id and persist the registration.
    #[instrument(skip(self))]
    pub async fn register(&self, calendar_id: &str) -> Result<NotificationChannel> {
        let Some(address) = self.webhook_url.clone() else {
            return Err(SiteCalError::Config("webhook url is not configured".into()));
        };
        if calendar_id.trim().is_empty() {
            return Err(SiteCalError::InvalidInput("calendar id is required".into()));
        }

        let request = WatchRequest {
            channel_id: Uuid::new_v4().to_string(),
            address,
            token: self.channel_token.clone(),
        };
        let registration =
            retry_with_backoff(self.retry, || self.provider.watch_calendar(calendar_id, &request))
                .await?;

        let channel = NotificationChannel::from_registration(calendar_id, registration, Utc::now());
        self.repository.upsert(&channel).await?;
        info!(
            channel_id = %channel.channel_id,
            resource_id = %channel.resource_id,
            expiration = %channel.expiration,
            "Registered push channel"
        );
        Ok(channel)
    }

    /// Register a new channel for every calendar whose most recent channel
    /// has expired. Expired records are kept.
    #[instrument(skip(self))]
    pub async fn renew_expired(&self, now: DateTime<Utc>) -> Result<Vec<NotificationChannel>> {
        let expired = self.repository.list_expired(now).await?;
        let calendars: BTreeSet<String> =
            expired.into_iter().map(|channel| channel.calendar_id).collect();

        let mut renewed = Vec::new();
        for calendar_id in calendars {
            let latest = self.repository.latest_for_calendar(&calendar_id).await?;
            if latest.is_some_and(|channel| !channel.is_expired(now)) {
                continue;
            }
            match self.register(&calendar_id).await {
                Ok(channel) => renewed.push(channel),
                Err(err) => warn!(%calendar_id, error = %err, "Failed to renew push channel"),
            }
        }
        Ok(renewed)
    }
}
