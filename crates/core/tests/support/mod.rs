//! Shared test helpers for `sitecal-core` integration tests.
//!
//! In-memory repositories and scripted provider doubles so scenario tests can
//! focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use chrono::{DateTime, TimeZone, Utc};
use sitecal_domain::{CalendarMapping, RemoteEvent, ResolvedCalendars, RetrySettings};

pub const PROJECT_CAL: &str = "c_project@group.calendar.google.com";
pub const WORK_ORDER_CAL: &str = "c_workorders@group.calendar.google.com";
pub const WEBHOOK_TOKEN: &str = "shared-secret";

/// Mapping with every slot configured.
pub fn resolved_calendars() -> ResolvedCalendars {
    sitecal_core::calendar::resolve_mapping(Some(&CalendarMapping {
        project: Some(PROJECT_CAL.into()),
        work_order: Some(WORK_ORDER_CAL.into()),
        adhoc: Some("primary".into()),
    }))
}

/// Retry settings with millisecond delays.
pub fn fast_retry() -> RetrySettings {
    RetrySettings { max_retries: 2, base_delay_ms: 1 }
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
}

pub fn remote_event(calendar_id: &str, id: &str, title: &str) -> RemoteEvent {
    RemoteEvent {
        id: id.into(),
        calendar_id: calendar_id.into(),
        title: title.into(),
        description: None,
        start: at(9),
        end: at(10),
        location: None,
        status: Some("confirmed".into()),
        updated: Some(at(8)),
    }
}
