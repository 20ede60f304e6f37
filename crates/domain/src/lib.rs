//! # SiteCal Domain
//!
//! Business domain types and models for SiteCal.
//!
//! This crate contains:
//! - Schedule items, notification channels and remote event payloads
//! - Calendar selection context and decision types
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other SiteCal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
