//! Calendar selection inputs and outputs.
//!
//! Both sides are ephemeral: a `CalendarSelectionContext` is built per
//! scheduling action and the resulting `CalendarSelection` is consumed by the
//! remote create call. Neither is persisted.

use serde::{Deserialize, Serialize};

use crate::impl_wire_enum;

/// Kind of entity being scheduled.
///
/// Unrecognised wire values fall back to `PersonalTask`, which is the default
/// rule of the selection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    ProjectMilestone,
    ScheduleItem,
    WorkOrder,
    ContactInteraction,
    TimeEntry,
    PersonalTask,
}

impl_wire_enum!(EntityType {
    ProjectMilestone => "project_milestone",
    ScheduleItem => "schedule_item",
    WorkOrder => "work_order",
    ContactInteraction => "contact_interaction",
    TimeEntry => "time_entry",
    PersonalTask => "personal_task",
});

impl EntityType {
    /// Lenient parse used at trust boundaries.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::PersonalTask)
    }
}

impl From<String> for EntityType {
    fn from(raw: String) -> Self {
        Self::parse_lenient(&raw)
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeKind {
    Employee,
    Subcontractor,
}

impl_wire_enum!(AssigneeKind {
    Employee => "employee",
    Subcontractor => "subcontractor",
});

/// A person assigned to the scheduled entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(rename = "type")]
    pub kind: AssigneeKind,
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Assignee {
    pub fn new(kind: AssigneeKind, id: impl Into<String>, email: Option<&str>) -> Self {
        Self { kind, id: id.into(), email: email.map(str::to_string) }
    }
}

/// Decision input for the selection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSelectionContext {
    pub entity_type: EntityType,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub work_order_id: Option<String>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl CalendarSelectionContext {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            project_id: None,
            work_order_id: None,
            assignees: Vec::new(),
            user_id: None,
            user_email: None,
        }
    }

    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn with_work_order(mut self, work_order_id: impl Into<String>) -> Self {
        self.work_order_id = Some(work_order_id.into());
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignees.push(assignee);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: Option<&str>, user_email: Option<&str>) -> Self {
        self.user_id = user_id.map(str::to_string);
        self.user_email = user_email.map(str::to_string);
        self
    }

    /// A project link counts only when it is non-blank.
    #[must_use]
    pub fn has_project(&self) -> bool {
        self.project_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Group,
    Personal,
}

impl_wire_enum!(CalendarKind {
    Group => "group",
    Personal => "personal",
});

/// Logical calendar slots resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalCalendar {
    Project,
    WorkOrder,
    Adhoc,
}

impl_wire_enum!(LogicalCalendar {
    Project => "project",
    WorkOrder => "work_order",
    Adhoc => "adhoc",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRef {
    pub id: String,
    pub kind: CalendarKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteRole {
    Owner,
    Assignee,
    Attendee,
}

impl_wire_enum!(InviteRole {
    Owner => "owner",
    Assignee => "assignee",
    Attendee => "attendee",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub email: String,
    pub role: InviteRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_kind: Option<AssigneeKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCalendar {
    pub calendar: CalendarRef,
    pub reason: String,
}

/// Decision output of the selection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSelection {
    pub primary: CalendarRef,
    pub invites: Vec<Invite>,
    #[serde(default)]
    pub additional_calendars: Vec<AdditionalCalendar>,
}

impl CalendarSelection {
    /// Invite e-mails in order, owner first.
    pub fn attendee_emails(&self) -> Vec<String> {
        self.invites.iter().map(|invite| invite.email.clone()).collect()
    }

    #[must_use]
    pub fn owner(&self) -> Option<&Invite> {
        self.invites.iter().find(|invite| invite.role == InviteRole::Owner)
    }
}

/// Logical calendar mapping as delivered by a configuration source.
///
/// Any slot may be missing; the resolver fills gaps with fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarMapping {
    #[serde(alias = "PROJECT")]
    pub project: Option<String>,
    #[serde(alias = "WORK_ORDER")]
    pub work_order: Option<String>,
    #[serde(alias = "ADHOC")]
    pub adhoc: Option<String>,
}

/// Physical calendar ids behind the logical slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCalendars {
    pub project: String,
    pub work_order: String,
    pub adhoc: String,
}

impl ResolvedCalendars {
    #[must_use]
    pub fn id_for(&self, slot: LogicalCalendar) -> &str {
        match slot {
            LogicalCalendar::Project => &self.project,
            LogicalCalendar::WorkOrder => &self.work_order,
            LogicalCalendar::Adhoc => &self.adhoc,
        }
    }
}
