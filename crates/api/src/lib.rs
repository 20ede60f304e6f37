//! # SiteCal API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes (webhook receiver, schedule items, channels, health)
//! - Application context (dependency injection)
//! - Main entry point and setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Provides HTTP endpoints for the UI and the calendar provider

pub mod context;
pub mod error;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use error::AppError;
pub use routes::router;
