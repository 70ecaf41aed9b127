//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod assignment;
pub mod driver;
pub mod idempotency_key;
pub mod payment;
pub mod ride;
pub mod trip;

pub use assignment::AssignmentEntity;
pub use driver::DriverEntity;
pub use idempotency_key::IdempotencyKeyEntity;
pub use payment::PaymentEntity;
pub use ride::RideEntity;
pub use trip::TripEntity;
