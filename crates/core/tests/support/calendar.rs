//! Calendar provider, auth gate and notifier doubles.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use sitecal_core::{CalendarAuthGate, CalendarProvider, ProviderResult, UserNotifier};
use sitecal_domain::{
    CalendarEventDraft, CalendarEventPatch, ProviderError, RemoteEvent, Result as DomainResult,
    SiteCalError, UserNotice, WatchRegistration, WatchRequest,
};

use super::at;

/// Scripted in-memory provider.
///
/// Queued failures are returned (front first) by whichever call comes next;
/// once the queue is empty calls succeed against the in-memory event map.
#[derive(Default, Clone)]
pub struct MockCalendarProvider {
    events: Arc<Mutex<HashMap<(String, String), RemoteEvent>>>,
    failures: Arc<Mutex<VecDeque<ProviderError>>>,
    calls: Arc<Mutex<Vec<String>>>,
    drafts: Arc<Mutex<Vec<CalendarEventDraft>>>,
    next_id: Arc<Mutex<u32>>,
}

impl MockCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: RemoteEvent) -> Self {
        self.events.lock().unwrap().insert((event.calendar_id.clone(), event.id.clone()), event);
        self
    }

    pub fn fail_next(&self, error: ProviderError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn fail_times(&self, times: usize, error: &ProviderError) {
        for _ in 0..times {
            self.fail_next(error.clone());
        }
    }

    /// Every call made, formatted as `operation:calendar_id`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        let prefix = format!("{operation}:");
        self.calls().iter().filter(|call| call.starts_with(&prefix)).count()
    }

    pub fn drafts(&self) -> Vec<CalendarEventDraft> {
        self.drafts.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, calendar_id: &str) -> ProviderResult<()> {
        self.calls.lock().unwrap().push(format!("{operation}:{calendar_id}"));
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn create_event(
        &self,
        calendar_id: &str,
        draft: &CalendarEventDraft,
    ) -> ProviderResult<String> {
        self.record("create", calendar_id)?;
        self.drafts.lock().unwrap().push(draft.clone());

        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let id = format!("evt-{next}");
        let start = draft.start.unwrap_or_else(|| at(9));
        let event = RemoteEvent {
            id: id.clone(),
            calendar_id: calendar_id.to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            start,
            end: draft.end.unwrap_or(start),
            location: draft.location.clone(),
            status: Some("confirmed".into()),
            updated: Some(start),
        };
        self.events.lock().unwrap().insert((calendar_id.to_string(), id.clone()), event);
        Ok(id)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &CalendarEventPatch,
    ) -> ProviderResult<String> {
        self.record("update", calendar_id)?;
        let mut events = self.events.lock().unwrap();
        let Some(event) = events.get_mut(&(calendar_id.to_string(), event_id.to_string())) else {
            return Err(ProviderError::http(404, "Not Found"));
        };
        if let Some(title) = &patch.title {
            event.title.clone_from(title);
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        Ok(event_id.to_string())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        self.record("delete", calendar_id)?;
        match self.events.lock().unwrap().remove(&(calendar_id.to_string(), event_id.to_string())) {
            Some(_) => Ok(()),
            None => Err(ProviderError::http(410, "Resource has been deleted")),
        }
    }

    async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> ProviderResult<Option<RemoteEvent>> {
        self.record("get", calendar_id)?;
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&(calendar_id.to_string(), event_id.to_string()))
            .filter(|event| event.status.as_deref() != Some("cancelled"))
            .cloned())
    }

    async fn watch_calendar(
        &self,
        calendar_id: &str,
        request: &WatchRequest,
    ) -> ProviderResult<WatchRegistration> {
        self.record("watch", calendar_id)?;
        Ok(WatchRegistration {
            id: request.channel_id.clone(),
            resource_id: format!("res-{calendar_id}"),
            expiration: at(0) + Duration::days(7),
        })
    }
}

/// Auth gate with a fixed answer.
#[derive(Clone)]
pub struct StaticAuthGate {
    authenticated: bool,
    prompt_result: Result<bool, SiteCalError>,
    prompts: Arc<Mutex<u32>>,
}

impl StaticAuthGate {
    pub fn signed_in() -> Self {
        Self { authenticated: true, prompt_result: Ok(true), prompts: Arc::default() }
    }

    /// Signed out; the interactive prompt answers with `accepted`.
    pub fn signed_out(accepted: bool) -> Self {
        Self { authenticated: false, prompt_result: Ok(accepted), prompts: Arc::default() }
    }

    pub fn prompts(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }
}

#[async_trait]
impl CalendarAuthGate for StaticAuthGate {
    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn request_authentication(&self) -> DomainResult<bool> {
        *self.prompts.lock().unwrap() += 1;
        self.prompt_result.clone()
    }
}

/// Collects every user notice.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<UserNotice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<UserNotice> {
        self.notices.lock().unwrap().clone()
    }
}

impl UserNotifier for RecordingNotifier {
    fn notify(&self, notice: UserNotice) {
        self.notices.lock().unwrap().push(notice);
    }
}
