//! SQLite persistence for schedule items and push channels.

pub mod manager;
pub mod notification_channel_repository;
pub mod schedule_item_repository;

pub use manager::{DbConnection, DbManager};
pub use notification_channel_repository::SqliteNotificationChannelRepository;
pub use schedule_item_repository::SqliteScheduleItemRepository;
