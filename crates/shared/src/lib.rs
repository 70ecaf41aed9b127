//! Shared utilities and common types for the ride coordination core.
//!
//! This crate provides common functionality used across all other crates:
//! - Coordinate validation logic shared by every lat/lon-bearing DTO

pub mod validation;
