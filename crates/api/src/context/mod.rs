//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use sitecal_core::webhook::ProjectInference;
use sitecal_core::{
    resolve_calendars, CalendarConfigSource, CalendarProvider, CalendarSelector, ChannelRegistrar,
    RemoteEventService, ScheduleSyncService, WebhookReconciler,
};
use sitecal_domain::{Config, Result, SiteCalError};
use sitecal_infra::{
    token_source_from_config, AccessTokenSource, BroadcastNotifier, DbManager,
    GoogleCalendarProvider, HttpCalendarConfigSource, ServiceCredentialGate,
    SqliteNotificationChannelRepository, SqliteScheduleItemRepository,
    StaticCalendarConfigSource,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub selector: CalendarSelector,
    pub schedule: Arc<ScheduleSyncService>,
    pub reconciler: Arc<WebhookReconciler>,
    pub channels: Arc<ChannelRegistrar>,
    pub notifier: BroadcastNotifier,
}

impl AppContext {
    /// Open the database, resolve the calendar mapping and wire every
    /// service from `config`.
    pub async fn new(config: Config) -> Result<Self> {
        let db = Arc::new(open_database(&config)?);
        let client = Client::builder()
            .build()
            .map_err(|e| SiteCalError::Config(format!("failed to build HTTP client: {e}")))?;

        let calendars = resolve_calendars(config_source(&client, &config).as_ref()).await;
        info!(
            project = %calendars.project,
            work_order = %calendars.work_order,
            adhoc = %calendars.adhoc,
            "Calendar mapping resolved"
        );
        let selector = CalendarSelector::new(calendars);

        let tokens: Arc<dyn AccessTokenSource> =
            Arc::from(token_source_from_config(client.clone(), &config.calendar));
        let provider: Arc<dyn CalendarProvider> = Arc::new(GoogleCalendarProvider::new(
            client,
            config.calendar.google_api_base.clone(),
            Arc::clone(&tokens),
        ));
        let notifier = BroadcastNotifier::new();

        let events = Arc::new(
            RemoteEventService::new(
                Arc::clone(&provider),
                Arc::new(ServiceCredentialGate::new(tokens)),
                Arc::new(notifier.clone()),
            )
            .with_retry(config.retry),
        );

        let schedule_items = Arc::new(SqliteScheduleItemRepository::new(Arc::clone(&db)));
        let schedule = Arc::new(ScheduleSyncService::new(
            selector.clone(),
            events,
            schedule_items.clone(),
        ));

        let reconciler = Arc::new(WebhookReconciler::new(
            Arc::clone(&provider),
            schedule_items,
            ProjectInference::new(
                config.calendar.calendar_projects.clone(),
                config.calendar.default_project_id.clone(),
            ),
            config.webhook.token.clone(),
        ));

        let channels = Arc::new(
            ChannelRegistrar::new(
                provider,
                Arc::new(SqliteNotificationChannelRepository::new(Arc::clone(&db))),
                config.webhook.url.clone(),
                config.webhook.token.clone(),
            )
            .with_retry(config.retry),
        );

        Ok(Self { config, db, selector, schedule, reconciler, channels, notifier })
    }
}

fn open_database(config: &Config) -> Result<DbManager> {
    let path = Path::new(&config.database.path);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            SiteCalError::Config(format!("cannot create database directory {}: {e}", parent.display()))
        })?;
    }

    let db = DbManager::new(path, config.database.pool_size)?;
    db.run_migrations()?;
    info!(path = %db.path().display(), "Database ready");
    Ok(db)
}

fn config_source(client: &Client, config: &Config) -> Box<dyn CalendarConfigSource> {
    match config.calendar.config_endpoint.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(endpoint) => Box::new(HttpCalendarConfigSource::new(client.clone(), endpoint)),
        None => Box::new(StaticCalendarConfigSource::from_config(&config.calendar)),
    }
}
