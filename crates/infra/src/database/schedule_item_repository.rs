//! SQLite implementation of the `ScheduleItemRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use sitecal_core::ScheduleItemRepository;
use sitecal_domain::{Result, ScheduleItem, SiteCalError};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::{
    blocking, decode_optional_timestamp, decode_timestamp, encode_timestamp, DbManager,
};
use crate::errors::InfraError;

const COLUMNS: &str = "id, project_id, title, description, start_time, end_time, location,
     calendar_id, google_event_id, calendar_integration_enabled, created_by,
     created_at, updated_at, last_synced_at, sync_error, attendees";

pub struct SqliteScheduleItemRepository {
    db: Arc<DbManager>,
}

impl SqliteScheduleItemRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<ScheduleItem> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(ScheduleItem {
        id,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_time: decode_timestamp(&row.get::<_, String>(4)?)?,
        end_time: decode_timestamp(&row.get::<_, String>(5)?)?,
        location: row.get(6)?,
        calendar_id: row.get(7)?,
        google_event_id: row.get(8)?,
        calendar_integration_enabled: row.get(9)?,
        created_by: row.get(10)?,
        created_at: decode_timestamp(&row.get::<_, String>(11)?)?,
        updated_at: decode_timestamp(&row.get::<_, String>(12)?)?,
        last_synced_at: decode_optional_timestamp(row.get(13)?)?,
        sync_error: row.get(14)?,
        attendees: decode_attendees(&row.get::<_, String>(15)?)?,
    })
}

fn encode_attendees(attendees: &[String]) -> Result<String> {
    serde_json::to_string(attendees)
        .map_err(|err| SiteCalError::Internal(format!("failed to encode attendees: {err}")))
}

fn decode_attendees(raw: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(15, rusqlite::types::Type::Text, Box::new(err))
    })
}

#[async_trait]
impl ScheduleItemRepository for SqliteScheduleItemRepository {
    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn insert(&self, item: &ScheduleItem) -> Result<()> {
        let db = Arc::clone(&self.db);
        let item = item.clone();
        blocking(move || {
            let attendees = encode_attendees(&item.attendees)?;
            let conn = db.get_connection()?;
            conn.execute(
                &format!(
                    "INSERT INTO schedule_items ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                params![
                    item.id.to_string(),
                    item.project_id,
                    item.title,
                    item.description,
                    encode_timestamp(item.start_time),
                    encode_timestamp(item.end_time),
                    item.location,
                    item.calendar_id,
                    item.google_event_id,
                    item.calendar_integration_enabled,
                    item.created_by,
                    encode_timestamp(item.created_at),
                    encode_timestamp(item.updated_at),
                    item.last_synced_at.map(encode_timestamp),
                    item.sync_error,
                    attendees,
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn update(&self, item: &ScheduleItem) -> Result<()> {
        let db = Arc::clone(&self.db);
        let item = item.clone();
        blocking(move || {
            let attendees = encode_attendees(&item.attendees)?;
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE schedule_items SET
                        project_id = ?2, title = ?3, description = ?4, start_time = ?5,
                        end_time = ?6, location = ?7, calendar_id = ?8, google_event_id = ?9,
                        calendar_integration_enabled = ?10, updated_at = ?11,
                        last_synced_at = ?12, sync_error = ?13, attendees = ?14
                     WHERE id = ?1",
                    params![
                        item.id.to_string(),
                        item.project_id,
                        item.title,
                        item.description,
                        encode_timestamp(item.start_time),
                        encode_timestamp(item.end_time),
                        item.location,
                        item.calendar_id,
                        item.google_event_id,
                        item.calendar_integration_enabled,
                        encode_timestamp(item.updated_at),
                        item.last_synced_at.map(encode_timestamp),
                        item.sync_error,
                        attendees,
                    ],
                )
                .map_err(InfraError::from)?;

            if changed == 0 {
                return Err(SiteCalError::NotFound(format!("schedule item {}", item.id)));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScheduleItem>> {
        let db = Arc::clone(&self.db);
        blocking(move || {
            let conn = db.get_connection()?;
            let item = conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM schedule_items WHERE id = ?1"),
                    [id.to_string()],
                    map_row,
                )
                .optional()
                .map_err(InfraError::from)?;
            Ok(item)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_google_event_id(&self, event_id: &str) -> Result<Option<ScheduleItem>> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();
        blocking(move || {
            let conn = db.get_connection()?;
            let item = conn
                .query_row(
                    &format!(
                        "SELECT {COLUMNS} FROM schedule_items
                         WHERE google_event_id = ?1 ORDER BY created_at LIMIT 1"
                    ),
                    [event_id],
                    map_row,
                )
                .optional()
                .map_err(InfraError::from)?;
            Ok(item)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let db = Arc::clone(&self.db);
        blocking(move || {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM schedule_items WHERE id = ?1", [id.to_string()])
                .map_err(InfraError::from)?;
            Ok(removed > 0)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_by_google_event_id(&self, event_id: &str) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();
        blocking(move || {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM schedule_items WHERE google_event_id = ?1", [&event_id])
                .map_err(InfraError::from)?;
            debug!(event_id = %event_id, removed, "deleted schedule items by remote id");
            Ok(removed)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_unpublished(&self, limit: usize) -> Result<Vec<ScheduleItem>> {
        let db = Arc::clone(&self.db);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        blocking(move || {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM schedule_items
                     WHERE calendar_integration_enabled = 1 AND google_event_id IS NULL
                     ORDER BY sync_error IS NOT NULL, created_at
                     LIMIT ?1"
                ))
                .map_err(InfraError::from)?;
            let items = stmt
                .query_map([limit], map_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;
            Ok(items)
        })
        .await
    }
}
