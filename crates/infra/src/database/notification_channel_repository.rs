//! SQLite implementation of the `NotificationChannelRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use sitecal_core::NotificationChannelRepository;
use sitecal_domain::{NotificationChannel, Result};
use tracing::instrument;

use super::manager::{blocking, decode_timestamp, encode_timestamp, DbManager};
use crate::errors::InfraError;

pub struct SqliteNotificationChannelRepository {
    db: Arc<DbManager>,
}

impl SqliteNotificationChannelRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<NotificationChannel> {
    Ok(NotificationChannel {
        channel_id: row.get(0)?,
        calendar_id: row.get(1)?,
        resource_id: row.get(2)?,
        expiration: decode_timestamp(&row.get::<_, String>(3)?)?,
        created_at: decode_timestamp(&row.get::<_, String>(4)?)?,
    })
}

#[async_trait]
impl NotificationChannelRepository for SqliteNotificationChannelRepository {
    #[instrument(skip(self, channel), fields(channel_id = %channel.channel_id))]
    async fn upsert(&self, channel: &NotificationChannel) -> Result<()> {
        let db = Arc::clone(&self.db);
        let channel = channel.clone();
        blocking(move || {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO push_notification_channels
                    (channel_id, calendar_id, resource_id, expiration, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(channel_id) DO UPDATE SET
                    calendar_id = excluded.calendar_id,
                    resource_id = excluded.resource_id,
                    expiration = excluded.expiration",
                params![
                    channel.channel_id,
                    channel.calendar_id,
                    channel.resource_id,
                    encode_timestamp(channel.expiration),
                    encode_timestamp(channel.created_at),
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, channel_id: &str) -> Result<Option<NotificationChannel>> {
        let db = Arc::clone(&self.db);
        let channel_id = channel_id.to_string();
        blocking(move || {
            let conn = db.get_connection()?;
            let channel = conn
                .query_row(
                    "SELECT channel_id, calendar_id, resource_id, expiration, created_at
                     FROM push_notification_channels WHERE channel_id = ?1",
                    [channel_id],
                    map_row,
                )
                .optional()
                .map_err(InfraError::from)?;
            Ok(channel)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn latest_for_calendar(&self, calendar_id: &str) -> Result<Option<NotificationChannel>> {
        let db = Arc::clone(&self.db);
        let calendar_id = calendar_id.to_string();
        blocking(move || {
            let conn = db.get_connection()?;
            let channel = conn
                .query_row(
                    "SELECT channel_id, calendar_id, resource_id, expiration, created_at
                     FROM push_notification_channels
                     WHERE calendar_id = ?1
                     ORDER BY expiration DESC
                     LIMIT 1",
                    [calendar_id],
                    map_row,
                )
                .optional()
                .map_err(InfraError::from)?;
            Ok(channel)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<NotificationChannel>> {
        let db = Arc::clone(&self.db);
        blocking(move || {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT channel_id, calendar_id, resource_id, expiration, created_at
                     FROM push_notification_channels
                     WHERE expiration < ?1
                     ORDER BY expiration",
                )
                .map_err(InfraError::from)?;
            let channels = stmt
                .query_map([encode_timestamp(now)], map_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;
            Ok(channels)
        })
        .await
    }
}
