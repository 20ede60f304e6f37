#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sitecal_domain::{NewScheduleItem, ScheduleItem};
use sitecal_infra::database::DbManager;
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("sitecal-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed instant on 2025-06-02 at `hour`:00 UTC.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).single().expect("valid timestamp")
}

/// Unpublished schedule item created at `created`.
pub fn schedule_item(title: &str, created: DateTime<Utc>) -> ScheduleItem {
    ScheduleItem::from_new(
        NewScheduleItem {
            project_id: "P-100".into(),
            title: title.into(),
            description: Some("Pour level 2 slab".into()),
            start_time: at(9),
            end_time: Some(at(11)),
            location: Some("Site A".into()),
            calendar_integration_enabled: true,
            created_by: Some("user-1".into()),
        },
        created,
    )
}
