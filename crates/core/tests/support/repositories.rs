//! In-memory implementations of the core repository ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sitecal_core::{NotificationChannelRepository, ScheduleItemRepository};
use sitecal_domain::{NotificationChannel, Result as DomainResult, ScheduleItem, SiteCalError};
use uuid::Uuid;

/// In-memory `ScheduleItemRepository`.
///
/// Rows are kept in insertion order; `fail_writes` makes every write return a
/// database error. Inserts enforce one row per remote event id.
#[derive(Default, Clone)]
pub struct InMemoryScheduleItems {
    items: Arc<Mutex<Vec<ScheduleItem>>>,
    fail_writes: Arc<Mutex<bool>>,
    stale_lookups: Arc<Mutex<usize>>,
}

impl InMemoryScheduleItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, item: ScheduleItem) -> Self {
        self.items.lock().unwrap().push(item);
        self
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    /// The next `count` remote-id lookups miss, as if another writer had
    /// not committed yet.
    pub fn miss_lookups(&self, count: usize) {
        *self.stale_lookups.lock().unwrap() = count;
    }

    pub fn all(&self) -> Vec<ScheduleItem> {
        self.items.lock().unwrap().clone()
    }

    fn check_writable(&self) -> DomainResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(SiteCalError::Database("disk I/O error".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleItemRepository for InMemoryScheduleItems {
    async fn insert(&self, item: &ScheduleItem) -> DomainResult<()> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        if item.google_event_id.is_some()
            && items.iter().any(|existing| existing.google_event_id == item.google_event_id)
        {
            return Err(SiteCalError::Database("unique constraint violation".into()));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &ScheduleItem) -> DomainResult<()> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(SiteCalError::NotFound(format!("schedule item {}", item.id))),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ScheduleItem>> {
        Ok(self.items.lock().unwrap().iter().find(|item| item.id == id).cloned())
    }

    async fn find_by_google_event_id(&self, event_id: &str) -> DomainResult<Option<ScheduleItem>> {
        {
            let mut stale = self.stale_lookups.lock().unwrap();
            if *stale > 0 {
                *stale -= 1;
                return Ok(None);
            }
        }
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.google_event_id.as_deref() == Some(event_id))
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    async fn delete_by_google_event_id(&self, event_id: &str) -> DomainResult<usize> {
        self.check_writable()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.google_event_id.as_deref() != Some(event_id));
        Ok(before - items.len())
    }

    async fn list_unpublished(&self, limit: usize) -> DomainResult<Vec<ScheduleItem>> {
        let mut pending: Vec<ScheduleItem> =
            self.items.lock().unwrap().iter().filter(|item| item.needs_publish()).cloned().collect();
        pending.sort_by_key(|item| (item.sync_error.is_some(), item.created_at));
        pending.truncate(limit);
        Ok(pending)
    }
}

/// In-memory `NotificationChannelRepository` keyed by channel id.
#[derive(Default, Clone)]
pub struct InMemoryChannels {
    channels: Arc<Mutex<HashMap<String, NotificationChannel>>>,
}

impl InMemoryChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(self, channel: NotificationChannel) -> Self {
        self.channels.lock().unwrap().insert(channel.channel_id.clone(), channel);
        self
    }

    pub fn len(&self) -> usize {
        self.channels.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationChannelRepository for InMemoryChannels {
    async fn upsert(&self, channel: &NotificationChannel) -> DomainResult<()> {
        self.channels.lock().unwrap().insert(channel.channel_id.clone(), channel.clone());
        Ok(())
    }

    async fn find_by_id(&self, channel_id: &str) -> DomainResult<Option<NotificationChannel>> {
        Ok(self.channels.lock().unwrap().get(channel_id).cloned())
    }

    async fn latest_for_calendar(
        &self,
        calendar_id: &str,
    ) -> DomainResult<Option<NotificationChannel>> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .values()
            .filter(|channel| channel.calendar_id == calendar_id)
            .max_by_key(|channel| channel.expiration)
            .cloned())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<NotificationChannel>> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .values()
            .filter(|channel| channel.is_expired(now))
            .cloned()
            .collect())
    }
}
