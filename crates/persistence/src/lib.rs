//! Persistence layer for the ride coordination core.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgStore`, the `domain::services::store::RideStore` implementation

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgStore;
