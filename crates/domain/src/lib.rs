//! Domain layer for the ride coordination core.
//!
//! This crate contains:
//! - Domain models (Ride, Assignment, Trip, Payment, Driver)
//! - The matching/assignment/trip/payment business logic services
//! - The framework-agnostic domain error type

pub mod error;
pub mod models;
pub mod services;
