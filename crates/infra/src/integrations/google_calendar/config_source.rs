//! Sources for the logical -> physical calendar mapping.

use async_trait::async_trait;
use reqwest::Client;
use sitecal_core::CalendarConfigSource;
use sitecal_domain::{CalendarConfig, CalendarMapping, Result, SiteCalError};
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Mapping taken from process configuration (environment or config file).
#[derive(Debug, Clone, Default)]
pub struct StaticCalendarConfigSource {
    mapping: CalendarMapping,
}

impl StaticCalendarConfigSource {
    pub fn new(mapping: CalendarMapping) -> Self {
        Self { mapping }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(CalendarMapping {
            project: config.project_calendar_id.clone(),
            work_order: config.work_order_calendar_id.clone(),
            adhoc: config.adhoc_calendar_id.clone(),
        })
    }
}

#[async_trait]
impl CalendarConfigSource for StaticCalendarConfigSource {
    async fn fetch_mapping(&self) -> Result<CalendarMapping> {
        Ok(self.mapping.clone())
    }
}

/// Mapping served by the remote configuration endpoint as
/// `{"PROJECT": "...", "WORK_ORDER": "...", "ADHOC": "..."}`.
pub struct HttpCalendarConfigSource {
    client: Client,
    endpoint: String,
}

impl HttpCalendarConfigSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl CalendarConfigSource for HttpCalendarConfigSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_mapping(&self) -> Result<CalendarMapping> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(InfraError::from)?
            .error_for_status()
            .map_err(InfraError::from)?;

        let mapping: CalendarMapping = response
            .json()
            .await
            .map_err(|e| SiteCalError::Config(format!("invalid calendar configuration: {e}")))?;
        debug!(?mapping, "Fetched calendar configuration");
        Ok(mapping)
    }
}
