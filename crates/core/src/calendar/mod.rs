//! Calendar selection and remote event operations.

pub mod classification;
pub mod config_resolver;
pub mod operations;
pub mod ports;
pub mod retry;
pub mod selection;

pub use classification::{classify_error, to_failure};
pub use config_resolver::{resolve_calendars, resolve_mapping};
pub use operations::RemoteEventService;
pub use retry::{retry_with_backoff, ClassifiedRetryPolicy};
pub use selection::{select_calendars, CalendarSelector};
