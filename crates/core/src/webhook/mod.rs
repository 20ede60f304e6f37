//! Inbound push-notification handling.

pub mod ownership;
pub mod reconciler;
pub mod resource;

pub use ownership::ProjectInference;
pub use reconciler::{ReconcileOutcome, WebhookReconciler, WebhookRejection};
pub use resource::{parse_resource_uri, EventResource};
