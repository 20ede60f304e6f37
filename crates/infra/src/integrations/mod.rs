//! External service integrations.

pub mod google_calendar;

pub use google_calendar::*;
