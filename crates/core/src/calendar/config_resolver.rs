//! Calendar configuration resolver.
//!
//! Turns whatever the configuration source delivers into a complete
//! `ResolvedCalendars`. Never fails: missing or blank ids are replaced by the
//! last-known-good fallbacks and each substitution is logged.

use sitecal_domain::constants::{
    ADHOC_CALENDAR_ID, FALLBACK_PROJECT_CALENDAR_ID, FALLBACK_WORK_ORDER_CALENDAR_ID,
};
use sitecal_domain::{CalendarMapping, LogicalCalendar, ResolvedCalendars};
use tracing::{debug, warn};

use super::ports::CalendarConfigSource;

/// Fetch the mapping from `source` and fill any gaps with fallbacks.
pub async fn resolve_calendars(source: &dyn CalendarConfigSource) -> ResolvedCalendars {
    match source.fetch_mapping().await {
        Ok(mapping) => resolve_mapping(Some(&mapping)),
        Err(err) => {
            warn!(error = %err, "Calendar configuration unavailable, using fallback calendars");
            resolve_mapping(None)
        }
    }
}

/// Pure resolution step: `None` means the source was unreachable.
pub fn resolve_mapping(mapping: Option<&CalendarMapping>) -> ResolvedCalendars {
    let pick = |slot: LogicalCalendar, configured: Option<&String>| -> String {
        match configured.map(|id| id.trim()).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let fallback = fallback_id(slot);
                if mapping.is_some() {
                    warn!(calendar = %slot, fallback, "Calendar id not configured, using fallback");
                }
                fallback.to_string()
            }
        }
    };

    let resolved = ResolvedCalendars {
        project: pick(LogicalCalendar::Project, mapping.and_then(|m| m.project.as_ref())),
        work_order: pick(LogicalCalendar::WorkOrder, mapping.and_then(|m| m.work_order.as_ref())),
        adhoc: pick(LogicalCalendar::Adhoc, mapping.and_then(|m| m.adhoc.as_ref())),
    };
    debug!(?resolved, "Resolved calendar configuration");
    resolved
}

/// Last-known-good id for a logical slot.
pub const fn fallback_id(slot: LogicalCalendar) -> &'static str {
    match slot {
        LogicalCalendar::Project => FALLBACK_PROJECT_CALENDAR_ID,
        LogicalCalendar::WorkOrder => FALLBACK_WORK_ORDER_CALENDAR_ID,
        LogicalCalendar::Adhoc => ADHOC_CALENDAR_ID,
    }
}
