//! Schedule item lifecycle against the scripted provider.

mod support;

use std::sync::Arc;

use sitecal_core::{CalendarSelector, RemoteEventService, ScheduleSyncService};
use sitecal_domain::{
    Assignee, AssigneeKind, CalendarErrorKind, CalendarOperation, CalendarSelectionContext,
    EntityType, NewScheduleItem, ProviderError, ScheduleItem, ScheduleItemPatch, SiteCalError,
};
use support::calendar::{MockCalendarProvider, RecordingNotifier, StaticAuthGate};
use support::repositories::InMemoryScheduleItems;
use support::{at, fast_retry, resolved_calendars, PROJECT_CAL, WORK_ORDER_CAL};

struct Harness {
    provider: MockCalendarProvider,
    items: InMemoryScheduleItems,
    notifier: RecordingNotifier,
    service: ScheduleSyncService,
}

fn harness_with(auth: StaticAuthGate) -> Harness {
    let provider = MockCalendarProvider::new();
    let items = InMemoryScheduleItems::new();
    let notifier = RecordingNotifier::default();
    let events = RemoteEventService::new(
        Arc::new(provider.clone()),
        Arc::new(auth),
        Arc::new(notifier.clone()),
    )
    .with_retry(fast_retry());
    let service = ScheduleSyncService::new(
        CalendarSelector::new(resolved_calendars()),
        Arc::new(events),
        Arc::new(items.clone()),
    );
    Harness { provider, items, notifier, service }
}

fn harness() -> Harness {
    harness_with(StaticAuthGate::signed_in())
}

fn new_item(title: &str) -> NewScheduleItem {
    NewScheduleItem {
        project_id: "P1".into(),
        title: title.into(),
        description: Some("Concrete crew on site".into()),
        start_time: at(8),
        end_time: None,
        location: Some("Lot 12".into()),
        calendar_integration_enabled: true,
        created_by: Some("u1".into()),
    }
}

fn project_context() -> CalendarSelectionContext {
    CalendarSelectionContext::new(EntityType::ScheduleItem)
        .with_project("P1")
        .with_assignee(Assignee::new(AssigneeKind::Employee, "e1", Some("a@x.com")))
        .with_user(Some("u1"), Some("u@x.com"))
}

/// Validates a successful create publishes before storing.
///
/// Assertions:
/// - Confirms the event lands on the project calendar with invitees
/// - Confirms the stored row carries the remote id and sync timestamp
#[tokio::test]
async fn create_publishes_to_selected_calendar_then_stores() {
    let h = harness();

    let item = h.service.create(new_item("Pour foundation"), &project_context()).await.unwrap();

    assert_eq!(h.provider.calls(), vec![format!("create:{PROJECT_CAL}")]);
    assert_eq!(h.provider.drafts()[0].attendees, vec!["u@x.com", "a@x.com"]);
    assert_eq!(item.google_event_id.as_deref(), Some("evt-1"));
    assert_eq!(item.calendar_id.as_deref(), Some(PROJECT_CAL));
    assert!(item.last_synced_at.is_some());
    assert!(item.sync_error.is_none());
    assert_eq!(h.items.all(), vec![item]);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn create_retries_rate_limit_then_succeeds() {
    let h = harness();
    h.provider.fail_times(2, &ProviderError::http(429, "Rate Limit Exceeded"));

    let item = h.service.create(new_item("Framing"), &project_context()).await.unwrap();

    assert_eq!(h.provider.call_count("create"), 3);
    assert!(item.is_published());
}

#[tokio::test]
async fn failed_create_still_stores_row_with_sync_error() {
    let h = harness();
    h.provider.fail_next(ProviderError::http(400, "Bad Request"));

    let item = h.service.create(new_item("Roofing"), &project_context()).await.unwrap();

    assert_eq!(h.provider.call_count("create"), 1);
    assert!(item.google_event_id.is_none());
    assert_eq!(item.sync_error.as_deref(), Some("invalid_parameters: Bad Request"));
    assert_eq!(h.items.all().len(), 1);

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, CalendarErrorKind::InvalidParameters);
    assert_eq!(notices[0].operation, CalendarOperation::Create);
}

/// Validates a declined sign-in aborts the create.
///
/// Assertions:
/// - Confirms no remote call is made and no row is stored
/// - Confirms the caller receives the cancellation and one notice is sent
#[tokio::test]
async fn declined_sign_in_cancels_without_remote_call() {
    let auth = StaticAuthGate::signed_out(false);
    let h = harness_with(auth.clone());

    let result = h.service.create(new_item("Inspection"), &project_context()).await;

    assert!(matches!(result, Err(SiteCalError::Auth(_))));
    assert!(h.provider.calls().is_empty());
    assert!(h.items.all().is_empty());
    assert_eq!(auth.prompts(), 1);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, CalendarErrorKind::UserCancelled);
}

#[tokio::test]
async fn declined_sign_in_leaves_update_and_delete_untouched() {
    let h = harness_with(StaticAuthGate::signed_out(false));
    let original = ScheduleItem::from_remote(
        &support::remote_event(PROJECT_CAL, "evt-5", "Pour"),
        "P1".into(),
        at(8),
    );
    let items = h.items.clone().with_item(original.clone());
    let patch = ScheduleItemPatch { title: Some("Pour slab".into()), ..ScheduleItemPatch::default() };

    assert!(matches!(h.service.update(original.id, &patch).await, Err(SiteCalError::Auth(_))));
    assert!(matches!(h.service.delete(original.id).await, Err(SiteCalError::Auth(_))));

    assert_eq!(items.all(), vec![original]);
    assert!(h.provider.calls().is_empty());
}

#[tokio::test]
async fn integration_disabled_skips_remote() {
    let h = harness();
    let mut new = new_item("Internal only");
    new.calendar_integration_enabled = false;

    let item = h.service.create(new, &project_context()).await.unwrap();

    assert!(h.provider.calls().is_empty());
    assert!(!item.needs_publish());
    assert!(item.sync_error.is_none());
}

#[tokio::test]
async fn blank_title_is_rejected_before_any_io() {
    let h = harness();

    let result = h.service.create(new_item("  "), &project_context()).await;

    assert!(matches!(result, Err(SiteCalError::InvalidInput(_))));
    assert!(h.provider.calls().is_empty());
    assert!(h.items.all().is_empty());
}

#[tokio::test]
async fn work_order_items_publish_to_work_order_calendar() {
    let h = harness();
    let ctx = CalendarSelectionContext::new(EntityType::WorkOrder).with_project("P1");

    let item = h.service.create(new_item("Replace HVAC"), &ctx).await.unwrap();

    assert_eq!(item.calendar_id.as_deref(), Some(WORK_ORDER_CAL));
}

#[tokio::test]
async fn update_pushes_patch_and_refreshes_local_row() {
    let h = harness();
    let created = h.service.create(new_item("Pour"), &project_context()).await.unwrap();
    let patch = ScheduleItemPatch {
        title: Some("Pour slab".into()),
        start_time: Some(at(9)),
        end_time: Some(at(11)),
        ..ScheduleItemPatch::default()
    };

    let updated = h.service.update(created.id, &patch).await.unwrap();

    assert_eq!(h.provider.call_count("update"), 1);
    assert_eq!(updated.title, "Pour slab");
    assert_eq!(updated.google_event_id, created.google_event_id);
    assert_eq!(h.items.all(), vec![updated]);
}

#[tokio::test]
async fn update_unknown_item_is_not_found() {
    let h = harness();
    let patch = ScheduleItemPatch { title: Some("x".into()), ..ScheduleItemPatch::default() };

    let result = h.service.update(uuid::Uuid::now_v7(), &patch).await;

    assert!(matches!(result, Err(SiteCalError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_remote_then_local() {
    let h = harness();
    let created = h.service.create(new_item("Pour"), &project_context()).await.unwrap();

    h.service.delete(created.id).await.unwrap();

    assert_eq!(h.provider.call_count("delete"), 1);
    assert!(h.items.all().is_empty());
}

#[tokio::test]
async fn delete_of_already_removed_event_succeeds() {
    let h = harness();
    let orphan = ScheduleItem::from_remote(
        &support::remote_event(PROJECT_CAL, "gone-1", "Stale"),
        "P1".into(),
        at(8),
    );
    let items = h.items.clone().with_item(orphan.clone());

    h.service.delete(orphan.id).await.unwrap();

    assert!(items.all().is_empty());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn remote_delete_failure_keeps_row_and_reports() {
    let h = harness();
    let created = h.service.create(new_item("Pour"), &project_context()).await.unwrap();
    h.provider.fail_next(ProviderError::http(403, "Forbidden"));

    let result = h.service.delete(created.id).await;

    assert!(matches!(result, Err(SiteCalError::Auth(_))));
    let rows = h.items.all();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].sync_error.is_some());
    assert_eq!(h.notifier.notices()[0].operation, CalendarOperation::Delete);
}

#[tokio::test]
async fn resync_publishes_pending_items() {
    let h = harness();
    h.provider.fail_next(ProviderError::transport("network unreachable"));
    h.provider.fail_next(ProviderError::transport("network unreachable"));
    h.provider.fail_next(ProviderError::transport("network unreachable"));
    let pending = h.service.create(new_item("Pour"), &project_context()).await.unwrap();
    assert!(pending.needs_publish());

    let report = h.service.resync_pending(10).await.unwrap();

    assert_eq!((report.attempted, report.published, report.failed), (1, 1, 0));
    let row = &h.items.all()[0];
    assert!(row.is_published());
    assert!(row.sync_error.is_none());
    assert_eq!(row.calendar_id.as_deref(), Some(PROJECT_CAL));
}

/// Validates resync publishes to the calendar chosen at creation.
///
/// Assertions:
/// - Confirms a work order that failed its first publish stays off the
///   project calendar on resync
/// - Confirms owner and assignee invites survive the retry
#[tokio::test]
async fn resync_reuses_work_order_target_and_invitees() {
    let h = harness();
    h.provider.fail_times(3, &ProviderError::transport("network unreachable"));
    let ctx = CalendarSelectionContext::new(EntityType::WorkOrder)
        .with_project("P1")
        .with_assignee(Assignee::new(AssigneeKind::Employee, "e2", Some("b@y.com")))
        .with_user(Some("u2"), Some("d@x.com"));

    let pending = h.service.create(new_item("Replace HVAC"), &ctx).await.unwrap();
    assert!(pending.needs_publish());
    assert_eq!(pending.calendar_id.as_deref(), Some(WORK_ORDER_CAL));

    let report = h.service.resync_pending(10).await.unwrap();

    assert_eq!((report.attempted, report.published, report.failed), (1, 1, 0));
    assert_eq!(h.provider.call_count("create"), 4);
    assert!(h.provider.calls().iter().all(|call| call == &format!("create:{WORK_ORDER_CAL}")));
    assert_eq!(h.provider.drafts()[0].attendees, vec!["d@x.com", "b@y.com"]);
    let row = &h.items.all()[0];
    assert_eq!(row.calendar_id.as_deref(), Some(WORK_ORDER_CAL));
    assert_eq!(row.attendees, vec!["d@x.com", "b@y.com"]);
    assert!(row.is_published());
}

#[tokio::test]
async fn resync_without_pinned_calendar_falls_back_to_project_schedule() {
    let h = harness();
    let mut legacy = ScheduleItem::from_new(new_item("Site walk"), at(6));
    legacy.mark_sync_failed("network_error: unreachable", at(6));
    let items = h.items.clone().with_item(legacy);

    let report = h.service.resync_pending(10).await.unwrap();

    assert_eq!(report.published, 1);
    assert_eq!(items.all()[0].calendar_id.as_deref(), Some(PROJECT_CAL));
}
