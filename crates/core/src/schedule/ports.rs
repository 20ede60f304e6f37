//! Port interfaces for schedule item persistence

use async_trait::async_trait;
use sitecal_domain::{Result, ScheduleItem};
use uuid::Uuid;

/// Local store for schedule items.
///
/// Writes are last-write-wins; no version check is performed.
#[async_trait]
pub trait ScheduleItemRepository: Send + Sync {
    /// Fails when another row already carries the same `google_event_id`.
    async fn insert(&self, item: &ScheduleItem) -> Result<()>;

    /// Replace every mutable column of an existing row.
    async fn update(&self, item: &ScheduleItem) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScheduleItem>>;

    async fn find_by_google_event_id(&self, event_id: &str) -> Result<Option<ScheduleItem>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Returns the number of rows removed (zero when absent).
    async fn delete_by_google_event_id(&self, event_id: &str) -> Result<usize>;

    /// Integration-enabled rows that still lack a remote event id. Rows that
    /// never failed come first, oldest first within each group.
    async fn list_unpublished(&self, limit: usize) -> Result<Vec<ScheduleItem>>;
}
