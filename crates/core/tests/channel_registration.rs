//! Push channel registration and renewal.

mod support;

use std::sync::Arc;

use chrono::Duration;
use sitecal_core::{ChannelRegistrar, NotificationChannelRepository};
use sitecal_domain::{NotificationChannel, ProviderError, SiteCalError};
use support::calendar::MockCalendarProvider;
use support::repositories::InMemoryChannels;
use support::{at, fast_retry, PROJECT_CAL, WEBHOOK_TOKEN, WORK_ORDER_CAL};

fn registrar(provider: &MockCalendarProvider, channels: &InMemoryChannels) -> ChannelRegistrar {
    ChannelRegistrar::new(
        Arc::new(provider.clone()),
        Arc::new(channels.clone()),
        Some("https://sitecal.example.com/webhooks/google-calendar".into()),
        Some(WEBHOOK_TOKEN.into()),
    )
    .with_retry(fast_retry())
}

fn channel(id: &str, calendar_id: &str, expires_in_hours: i64) -> NotificationChannel {
    NotificationChannel {
        channel_id: id.into(),
        calendar_id: calendar_id.into(),
        resource_id: format!("res-{id}"),
        expiration: at(12) + Duration::hours(expires_in_hours),
        created_at: at(0),
    }
}

#[tokio::test]
async fn register_persists_watch_registration() {
    let provider = MockCalendarProvider::new();
    let channels = InMemoryChannels::new();

    let created = registrar(&provider, &channels).register(PROJECT_CAL).await.unwrap();

    assert_eq!(provider.calls(), vec![format!("watch:{PROJECT_CAL}")]);
    assert_eq!(created.calendar_id, PROJECT_CAL);
    assert!(uuid::Uuid::parse_str(&created.channel_id).is_ok());
    let stored = channels.find_by_id(&created.channel_id).await.unwrap();
    assert_eq!(stored, Some(created));
}

#[tokio::test]
async fn register_without_webhook_url_is_config_error() {
    let provider = MockCalendarProvider::new();
    let registrar =
        ChannelRegistrar::new(Arc::new(provider.clone()), Arc::new(InMemoryChannels::new()), None, None);

    let result = registrar.register(PROJECT_CAL).await;

    assert!(matches!(result, Err(SiteCalError::Config(_))));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn register_surfaces_classified_provider_failure() {
    let provider = MockCalendarProvider::new();
    provider.fail_next(ProviderError::http(401, "Invalid Credentials"));
    let channels = InMemoryChannels::new();

    let result = registrar(&provider, &channels).register(PROJECT_CAL).await;

    assert!(matches!(result, Err(SiteCalError::Auth(_))));
    assert_eq!(channels.len(), 0);
}

/// Validates renewal only touches calendars without a live channel.
///
/// Assertions:
/// - Confirms an expired calendar gets exactly one new channel
/// - Confirms a calendar with a newer live channel is skipped
/// - Confirms expired records are kept
#[tokio::test]
async fn renew_registers_only_lapsed_calendars() {
    let provider = MockCalendarProvider::new();
    let channels = InMemoryChannels::new()
        .with_channel(channel("old-project", PROJECT_CAL, -2))
        .with_channel(channel("old-wo", WORK_ORDER_CAL, -5))
        .with_channel(channel("live-wo", WORK_ORDER_CAL, 48));

    let renewed = registrar(&provider, &channels).renew_expired(at(12)).await.unwrap();

    assert_eq!(renewed.len(), 1);
    assert_eq!(renewed[0].calendar_id, PROJECT_CAL);
    assert_eq!(provider.call_count("watch"), 1);
    assert_eq!(channels.len(), 4);
}
