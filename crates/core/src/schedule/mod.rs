//! Schedule item persistence and publishing.

pub mod ports;
pub mod service;

pub use service::{ScheduleSyncService, SyncReport};
