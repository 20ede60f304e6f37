//! Domain types and models

pub mod channel;
pub mod event;
pub mod notice;
pub mod schedule;
pub mod selection;
pub mod webhook;

pub use channel::NotificationChannel;
pub use event::{
    CalendarEventDraft, CalendarEventPatch, RemoteEvent, WatchRegistration, WatchRequest,
};
pub use notice::{CalendarOperation, UserNotice};
pub use schedule::{NewScheduleItem, ScheduleItem, ScheduleItemPatch};
pub use selection::{
    AdditionalCalendar, Assignee, AssigneeKind, CalendarKind, CalendarMapping, CalendarRef,
    CalendarSelection, CalendarSelectionContext, EntityType, Invite, InviteRole, LogicalCalendar,
    ResolvedCalendars,
};
pub use webhook::{ResourceState, WebhookNotification};
