//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Last-known-good calendar ids, used when configuration is missing
pub const FALLBACK_PROJECT_CALENDAR_ID: &str =
    "c_8e1f4a6b2d9c47f0a3b5e7d1c9f20a64@group.calendar.google.com";
pub const FALLBACK_WORK_ORDER_CALENDAR_ID: &str =
    "c_3b7d9e2f5a8c41d6b0e4f7a2c5d8e1b9@group.calendar.google.com";
pub const ADHOC_CALENDAR_ID: &str = "primary";

// Display names
pub const PROJECT_CALENDAR_NAME: &str = "Projects";
pub const WORK_ORDER_CALENDAR_NAME: &str = "Work Orders";
pub const ADHOC_CALENDAR_NAME: &str = "Personal";

// Remote call retry policy
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const RETRY_BACKOFF_FACTOR: f64 = 2.0;

// Events without an explicit end time
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

// Google Calendar
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_EVENT_STATUS_CANCELLED: &str = "cancelled";
pub const UNTITLED_EVENT_TITLE: &str = "(No title)";

// Reconciler ownership inference
pub const DEFAULT_PROJECT_ID: &str = "general";
pub const PROJECT_TAG_PREFIX: &str = "project:";

// Local persistence
pub const DEFAULT_DATABASE_PATH: &str = "sitecal.db";
pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_RESYNC_BATCH: usize = 50;
