//! Port interfaces for calendar integration
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use sitecal_domain::{
    CalendarEventDraft, CalendarEventPatch, CalendarMapping, ProviderError, RemoteEvent, Result,
    UserNotice, WatchRegistration, WatchRequest,
};

/// Result of a remote provider call.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Remote calendar API.
///
/// Adapters report raw `ProviderError`s; classification happens in core.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Create an event and return its remote id.
    async fn create_event(
        &self,
        calendar_id: &str,
        draft: &CalendarEventDraft,
    ) -> ProviderResult<String>;

    /// Patch an event and return its remote id.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &CalendarEventPatch,
    ) -> ProviderResult<String>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()>;

    /// Fetch an event. `Ok(None)` when it is gone or cancelled.
    async fn get_event(&self, calendar_id: &str, event_id: &str)
        -> ProviderResult<Option<RemoteEvent>>;

    /// Subscribe to push notifications for a calendar.
    async fn watch_calendar(
        &self,
        calendar_id: &str,
        request: &WatchRequest,
    ) -> ProviderResult<WatchRegistration>;
}

/// Interactive authentication against the calendar provider.
#[async_trait]
pub trait CalendarAuthGate: Send + Sync {
    async fn is_authenticated(&self) -> bool;

    /// Offer the interactive sign-in step. `Ok(false)` means the user declined.
    async fn request_authentication(&self) -> Result<bool>;
}

/// Source of the logical calendar mapping (environment, configuration endpoint).
#[async_trait]
pub trait CalendarConfigSource: Send + Sync {
    async fn fetch_mapping(&self) -> Result<CalendarMapping>;
}

/// Delivers user-visible notices.
pub trait UserNotifier: Send + Sync {
    fn notify(&self, notice: UserNotice);
}
