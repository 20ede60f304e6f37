//! Google Calendar integration: HTTP provider, credentials and calendar
//! configuration sources.

pub mod auth;
pub mod config_source;
pub mod provider;
pub mod token;

pub use auth::ServiceCredentialGate;
pub use config_source::{HttpCalendarConfigSource, StaticCalendarConfigSource};
pub use provider::GoogleCalendarProvider;
pub use token::{token_source_from_config, AccessTokenSource, RefreshTokenSource, StaticTokenSource};
