//! Configuration structures
//!
//! Every section deserializes with defaults so a partial TOML/JSON file (or
//! an empty environment) still produces a usable `Config`.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DATABASE_PATH, DEFAULT_MAX_RETRIES, DEFAULT_POOL_SIZE,
    DEFAULT_PROJECT_ID, DEFAULT_RETRY_BASE_DELAY_MS, GOOGLE_CALENDAR_API_BASE, GOOGLE_TOKEN_URL,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub calendar: CalendarConfig,
    pub webhook: WebhookConfig,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DATABASE_PATH.to_string(), pool_size: DEFAULT_POOL_SIZE }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR.to_string() }
    }
}

/// Calendar provider settings and the logical calendar mapping.
///
/// Unset calendar ids are resolved to fallbacks by the configuration
/// resolver, never here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalendarConfig {
    pub project_calendar_id: Option<String>,
    pub work_order_calendar_id: Option<String>,
    pub adhoc_calendar_id: Option<String>,
    /// Remote configuration endpoint returning the logical calendar mapping.
    pub config_endpoint: Option<String>,
    pub google_api_base: String,
    pub token_url: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Explicit calendar id -> project id ownership map.
    pub calendar_projects: HashMap<String, String>,
    pub default_project_id: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            project_calendar_id: None,
            work_order_calendar_id: None,
            adhoc_calendar_id: None,
            config_endpoint: None,
            google_api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            access_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            calendar_projects: HashMap::new(),
            default_project_id: DEFAULT_PROJECT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebhookConfig {
    /// Shared secret echoed back in `X-Goog-Channel-Token`.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Public address the provider pushes notifications to.
    pub url: Option<String>,
}

/// Retry budget for remote calendar calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl RetrySettings {
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Total attempts including the first one.
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS }
    }
}
