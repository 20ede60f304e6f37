//! # SiteCal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Database implementations (SQLite via r2d2)
//! - Google Calendar HTTP adapter and credential sources
//! - Configuration loading (environment, TOML/JSON files)
//! - Notice fan-out
//!
//! ## Architecture
//! - Implements traits defined in `sitecal-core`
//! - Depends on `sitecal-domain` and `sitecal-core`
//! - Contains all "impure" code (I/O, HTTP, SQL)

pub mod config;
pub mod database;
pub mod errors;
pub mod integrations;
pub mod notifier;

// Re-export commonly used items
pub use config::*;
pub use database::*;
pub use errors::InfraError;
pub use integrations::*;
pub use notifier::BroadcastNotifier;
