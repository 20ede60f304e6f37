//! # SiteCal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Calendar selection, configuration resolution and error classification
//! - Port/adapter interfaces (traits)
//! - Remote event operations, webhook reconciliation and sync services
//!
//! ## Architecture Principles
//! - Only depends on `sitecal-common` and `sitecal-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar;
pub mod channels;
pub mod schedule;
pub mod webhook;

// Re-export specific items to avoid ambiguity
pub use calendar::ports::{
    CalendarAuthGate, CalendarConfigSource, CalendarProvider, ProviderResult, UserNotifier,
};
pub use calendar::{
    classify_error, resolve_calendars, retry_with_backoff, select_calendars, CalendarSelector,
    RemoteEventService,
};
pub use channels::ports::NotificationChannelRepository;
pub use channels::ChannelRegistrar;
pub use schedule::ports::ScheduleItemRepository;
pub use schedule::{ScheduleSyncService, SyncReport};
pub use webhook::{ReconcileOutcome, WebhookReconciler, WebhookRejection};
