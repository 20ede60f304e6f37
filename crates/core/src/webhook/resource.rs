//! Resource URI parsing for push notifications.

use url::Url;

/// Calendar and event addressed by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventResource {
    pub calendar_id: String,
    pub event_id: String,
}

/// Parse `.../calendars/{calendarId}/events/{eventId}` (query ignored).
pub fn parse_resource_uri(raw: &str) -> Option<EventResource> {
    let url = Url::parse(raw.trim()).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();

    let at = segments.iter().position(|segment| *segment == "calendars")?;
    let calendar = segments.get(at + 1)?;
    if segments.get(at + 2) != Some(&"events") {
        return None;
    }
    let event = segments.get(at + 3)?;

    let calendar_id = decode(calendar)?;
    let event_id = decode(event)?;
    Some(EventResource { calendar_id, event_id })
}

fn decode(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
