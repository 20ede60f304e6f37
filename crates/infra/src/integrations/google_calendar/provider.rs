//! Google Calendar v3 implementation of the `CalendarProvider` port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use sitecal_core::{CalendarProvider, ProviderResult};
use sitecal_domain::constants::{GOOGLE_EVENT_STATUS_CANCELLED, UNTITLED_EVENT_TITLE};
use sitecal_domain::{
    CalendarEventDraft, CalendarEventPatch, ProviderError, RemoteEvent, WatchRegistration,
    WatchRequest,
};
use tracing::{debug, instrument, warn};

use super::token::AccessTokenSource;
use crate::errors::transport_error;

/// Google error reasons that mean "slow down" despite a 403 status.
const THROTTLE_REASONS: [&str; 3] = ["rateLimitExceeded", "userRateLimitExceeded", "quotaExceeded"];

/// HTTP client for the Google Calendar API.
pub struct GoogleCalendarProvider {
    client: Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenSource>,
}

impl GoogleCalendarProvider {
    pub fn new(client: Client, base_url: impl Into<String>, tokens: Arc<dyn AccessTokenSource>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, tokens }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, urlencoding::encode(calendar_id))
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!("{}/{}", self.events_url(calendar_id), urlencoding::encode(event_id))
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|err| ProviderError::http(401, format!("authentication required: {err}")))?;

        request.bearer_auth(token).send().await.map_err(|err| transport_error(&err))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    #[instrument(skip(self, draft))]
    async fn create_event(
        &self,
        calendar_id: &str,
        draft: &CalendarEventDraft,
    ) -> ProviderResult<String> {
        let body = EventBody::from_draft(draft);
        let request = self
            .client
            .post(self.events_url(calendar_id))
            .query(&[("sendUpdates", "all")])
            .json(&body);

        let created: GoogleEvent = read_json(self.send(request).await?).await?;
        debug!(event_id = %created.id, "Google event created");
        Ok(created.id)
    }

    #[instrument(skip(self, patch))]
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &CalendarEventPatch,
    ) -> ProviderResult<String> {
        let body = EventBody::from_patch(patch);
        let request = self
            .client
            .patch(self.event_url(calendar_id, event_id))
            .query(&[("sendUpdates", "all")])
            .json(&body);

        let updated: GoogleEvent = read_json(self.send(request).await?).await?;
        Ok(updated.id)
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        let request = self
            .client
            .delete(self.event_url(calendar_id, event_id))
            .query(&[("sendUpdates", "all")]);

        let response = self.send(request).await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(response).await)
    }

    #[instrument(skip(self))]
    async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> ProviderResult<Option<RemoteEvent>> {
        let request = self.client.get(self.event_url(calendar_id, event_id));
        let response = self.send(request).await?;

        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            debug!(status = %response.status(), "Google event no longer exists");
            return Ok(None);
        }

        let event: GoogleEvent = read_json(response).await?;
        if event.status.as_deref() == Some(GOOGLE_EVENT_STATUS_CANCELLED) {
            return Ok(None);
        }
        event.into_remote(calendar_id).map(Some)
    }

    #[instrument(skip(self, request), fields(channel_id = %request.channel_id))]
    async fn watch_calendar(
        &self,
        calendar_id: &str,
        request: &WatchRequest,
    ) -> ProviderResult<WatchRegistration> {
        let body = WatchBody {
            id: &request.channel_id,
            kind: "web_hook",
            address: &request.address,
            token: request.token.as_deref(),
        };
        let http = self.client.post(format!("{}/watch", self.events_url(calendar_id))).json(&body);

        let channel: GoogleChannel = read_json(self.send(http).await?).await?;
        let expiration = channel
            .expiration
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| ProviderError::new(None, "watch response missing expiration"))?;

        Ok(WatchRegistration { id: channel.id, resource_id: channel.resource_id, expiration })
    }
}

async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> ProviderResult<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let status = response.status().as_u16();
    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::new(Some(status), format!("unexpected response body: {err}")))
}

/// Turn a non-success response into a `ProviderError`.
///
/// Google reports throttling as 403 with a rate-limit reason; those are
/// reported as 429 so they classify as `rate_limit`.
async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let parsed = serde_json::from_str::<GoogleErrorEnvelope>(&body).ok().map(|env| env.error);
    let reason = parsed
        .as_ref()
        .and_then(|error| error.errors.first())
        .and_then(|detail| detail.reason.clone());
    let message = parsed
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or(body);

    let throttled = reason.as_deref().is_some_and(|reason| THROTTLE_REASONS.contains(&reason));
    let status = if throttled { 429 } else { status };
    warn!(status, reason = reason.as_deref().unwrap_or_default(), "Google Calendar API error");

    ProviderError::http(status, message)
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<EventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<EventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attendees: Option<Vec<Attendee>>,
}

impl EventBody {
    fn from_draft(draft: &CalendarEventDraft) -> Self {
        let end = draft.end.or(draft.start);
        Self {
            summary: Some(draft.title.clone()),
            description: draft.description.clone(),
            location: draft.location.clone(),
            start: draft.start.map(EventTime::at),
            end: end.map(EventTime::at),
            attendees: Some(attendees(&draft.attendees)),
        }
    }

    fn from_patch(patch: &CalendarEventPatch) -> Self {
        Self {
            summary: patch.title.clone(),
            description: patch.description.clone(),
            location: patch.location.clone(),
            start: patch.start.map(EventTime::at),
            end: patch.end.map(EventTime::at),
            attendees: patch.attendees.as_deref().map(attendees),
        }
    }
}

fn attendees(emails: &[String]) -> Vec<Attendee> {
    emails.iter().map(|email| Attendee { email: email.clone() }).collect()
}

#[derive(Debug, Serialize)]
struct Attendee {
    email: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

impl EventTime {
    fn at(value: DateTime<Utc>) -> Self {
        Self { date_time: Some(value.to_rfc3339()), date: None }
    }

    /// Timed events carry `dateTime`; all-day events carry `date` and start
    /// at midnight UTC.
    fn resolve(&self) -> Option<DateTime<Utc>> {
        if let Some(raw) = &self.date_time {
            return DateTime::parse_from_rfc3339(raw).ok().map(|value| value.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc())
    }
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    start: Option<EventTime>,
    #[serde(default)]
    end: Option<EventTime>,
}

impl GoogleEvent {
    fn into_remote(self, calendar_id: &str) -> ProviderResult<RemoteEvent> {
        let start = self.start.as_ref().and_then(EventTime::resolve).ok_or_else(|| {
            ProviderError::new(None, format!("event {} has no usable start time", self.id))
        })?;
        let end = self.end.as_ref().and_then(EventTime::resolve).unwrap_or(start);
        let updated = self
            .updated
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|value| value.with_timezone(&Utc));
        let title = self
            .summary
            .filter(|summary| !summary.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_EVENT_TITLE.to_string());

        Ok(RemoteEvent {
            id: self.id,
            calendar_id: calendar_id.to_string(),
            title,
            description: self.description,
            start,
            end,
            location: self.location,
            status: self.status,
            updated,
        })
    }
}

#[derive(Debug, Serialize)]
struct WatchBody<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleChannel {
    id: String,
    resource_id: String,
    #[serde(default)]
    expiration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}
