//! Calendar selection engine.
//!
//! Decides which calendar holds an event's canonical copy and who is invited
//! to it. Pure: the only input besides the context is the already-resolved
//! calendar mapping.
//!
//! | entity type                      | primary                 | invites                   |
//! |----------------------------------|-------------------------|---------------------------|
//! | project milestone, schedule item | PROJECT (group)         | owner + assignees         |
//! | work order                       | WORK_ORDER (group)      | owner + assignees         |
//! | contact interaction, time entry  | PROJECT if linked       | as project, else personal |
//! | personal task / anything else    | ADHOC (personal)        | assignees as attendees    |

use std::collections::HashSet;

use sitecal_domain::constants::{
    ADHOC_CALENDAR_NAME, PROJECT_CALENDAR_NAME, WORK_ORDER_CALENDAR_NAME,
};
use sitecal_domain::{
    CalendarKind, CalendarRef, CalendarSelection, CalendarSelectionContext, EntityType, Invite,
    InviteRole, LogicalCalendar, ResolvedCalendars,
};

/// Which rule of the decision table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Group(LogicalCalendar),
    Personal,
}

fn rule_for(ctx: &CalendarSelectionContext) -> Rule {
    match ctx.entity_type {
        EntityType::ProjectMilestone | EntityType::ScheduleItem => {
            Rule::Group(LogicalCalendar::Project)
        }
        EntityType::WorkOrder => Rule::Group(LogicalCalendar::WorkOrder),
        EntityType::ContactInteraction | EntityType::TimeEntry => {
            if ctx.has_project() {
                Rule::Group(LogicalCalendar::Project)
            } else {
                Rule::Personal
            }
        }
        EntityType::PersonalTask => Rule::Personal,
    }
}

/// Select the primary calendar and invites for `ctx`.
pub fn select_calendars(
    ctx: &CalendarSelectionContext,
    calendars: &ResolvedCalendars,
) -> CalendarSelection {
    match rule_for(ctx) {
        Rule::Group(slot) => CalendarSelection {
            primary: calendar_ref(slot, calendars),
            invites: group_invites(ctx),
            additional_calendars: Vec::new(),
        },
        Rule::Personal => CalendarSelection {
            primary: calendar_ref(LogicalCalendar::Adhoc, calendars),
            invites: personal_invites(ctx),
            additional_calendars: Vec::new(),
        },
    }
}

fn calendar_ref(slot: LogicalCalendar, calendars: &ResolvedCalendars) -> CalendarRef {
    let (kind, name) = match slot {
        LogicalCalendar::Project => (CalendarKind::Group, PROJECT_CALENDAR_NAME),
        LogicalCalendar::WorkOrder => (CalendarKind::Group, WORK_ORDER_CALENDAR_NAME),
        LogicalCalendar::Adhoc => (CalendarKind::Personal, ADHOC_CALENDAR_NAME),
    };
    CalendarRef { id: calendars.id_for(slot).to_string(), kind, name: name.to_string() }
}

/// Owner first, then every assignee with a usable address.
fn group_invites(ctx: &CalendarSelectionContext) -> Vec<Invite> {
    let mut seen = HashSet::new();
    let mut invites = Vec::with_capacity(ctx.assignees.len() + 1);

    if let Some(owner) = usable_email(ctx.user_email.as_deref()) {
        seen.insert(owner.to_ascii_lowercase());
        invites.push(Invite {
            email: owner.to_string(),
            role: InviteRole::Owner,
            assignee_kind: None,
        });
    }

    push_assignees(ctx, InviteRole::Assignee, &mut seen, &mut invites);
    invites
}

fn personal_invites(ctx: &CalendarSelectionContext) -> Vec<Invite> {
    let mut seen = HashSet::new();
    let mut invites = Vec::with_capacity(ctx.assignees.len());
    push_assignees(ctx, InviteRole::Attendee, &mut seen, &mut invites);
    invites
}

fn push_assignees(
    ctx: &CalendarSelectionContext,
    role: InviteRole,
    seen: &mut HashSet<String>,
    invites: &mut Vec<Invite>,
) {
    for assignee in &ctx.assignees {
        let Some(email) = usable_email(assignee.email.as_deref()) else {
            continue;
        };
        if seen.insert(email.to_ascii_lowercase()) {
            invites.push(Invite {
                email: email.to_string(),
                role,
                assignee_kind: Some(assignee.kind),
            });
        }
    }
}

fn usable_email(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|email| !email.is_empty())
}

/// Selection engine bound to a resolved calendar mapping.
#[derive(Debug, Clone)]
pub struct CalendarSelector {
    calendars: ResolvedCalendars,
}

impl CalendarSelector {
    pub fn new(calendars: ResolvedCalendars) -> Self {
        Self { calendars }
    }

    pub fn select(&self, ctx: &CalendarSelectionContext) -> CalendarSelection {
        select_calendars(ctx, &self.calendars)
    }

    pub fn calendars(&self) -> &ResolvedCalendars {
        &self.calendars
    }
}

#[cfg(test)]
mod tests {
    use sitecal_domain::{Assignee, AssigneeKind};

    use super::*;

    fn calendars() -> ResolvedCalendars {
        ResolvedCalendars {
            project: "projects@group".into(),
            work_order: "work-orders@group".into(),
            adhoc: "primary".into(),
        }
    }

    #[test]
    fn contact_interaction_without_project_uses_personal_rule() {
        let ctx = CalendarSelectionContext::new(EntityType::ContactInteraction)
            .with_user(Some("u1"), Some("u@x.com"))
            .with_assignee(Assignee::new(AssigneeKind::Employee, "e1", Some("a@x.com")));

        let selection = select_calendars(&ctx, &calendars());

        assert_eq!(selection.primary.id, "primary");
        assert_eq!(selection.primary.kind, CalendarKind::Personal);
        assert_eq!(selection.invites.len(), 1);
        assert_eq!(selection.invites[0].role, InviteRole::Attendee);
        assert!(selection.owner().is_none());
    }

    #[test]
    fn time_entry_with_project_uses_project_calendar() {
        let ctx = CalendarSelectionContext::new(EntityType::TimeEntry)
            .with_project("P7")
            .with_user(None, Some("u@x.com"));

        let selection = select_calendars(&ctx, &calendars());

        assert_eq!(selection.primary.id, "projects@group");
        assert_eq!(selection.primary.name, "Projects");
        assert_eq!(selection.invites[0].role, InviteRole::Owner);
    }

    #[test]
    fn duplicate_addresses_collapse_to_first_occurrence() {
        let ctx = CalendarSelectionContext::new(EntityType::ScheduleItem)
            .with_user(None, Some("u@x.com"))
            .with_assignee(Assignee::new(AssigneeKind::Employee, "e1", Some("U@X.com")))
            .with_assignee(Assignee::new(AssigneeKind::Employee, "e2", Some("a@x.com")))
            .with_assignee(Assignee::new(AssigneeKind::Subcontractor, "s1", Some("a@x.com")));

        let selection = select_calendars(&ctx, &calendars());
        let emails: Vec<_> = selection.invites.iter().map(|i| i.email.as_str()).collect();

        assert_eq!(emails, vec!["u@x.com", "a@x.com"]);
        assert_eq!(selection.invites[1].assignee_kind, Some(AssigneeKind::Employee));
    }

    #[test]
    fn blank_acting_user_email_produces_no_owner() {
        let ctx = CalendarSelectionContext::new(EntityType::ProjectMilestone)
            .with_user(Some("u1"), Some(""))
            .with_assignee(Assignee::new(AssigneeKind::Employee, "e1", Some("a@x.com")));

        let selection = select_calendars(&ctx, &calendars());

        assert!(selection.owner().is_none());
        assert_eq!(selection.invites[0].role, InviteRole::Assignee);
    }

    #[test]
    fn selector_uses_bound_calendars() {
        let selector = CalendarSelector::new(calendars());
        let selection = selector.select(&CalendarSelectionContext::new(EntityType::WorkOrder));

        assert_eq!(selection.primary.id, "work-orders@group");
        assert_eq!(selection.primary.name, "Work Orders");
        assert!(selection.invites.is_empty());
    }
}
