//! User-visible notices for failed calendar operations.

use serde::{Deserialize, Serialize};

use crate::errors::{CalendarErrorKind, CalendarFailure};
use crate::impl_wire_enum;

/// User-initiated remote calendar operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarOperation {
    Create,
    Update,
    Delete,
}

impl_wire_enum!(CalendarOperation {
    Create => "create",
    Update => "update",
    Delete => "delete",
});

/// One notification per failed user-initiated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotice {
    pub kind: CalendarErrorKind,
    pub message: String,
    pub operation: CalendarOperation,
}

impl UserNotice {
    pub fn from_failure(operation: CalendarOperation, failure: &CalendarFailure) -> Self {
        Self { kind: failure.reason, message: failure.message.clone(), operation }
    }
}
