//! Repository implementations for database operations.

pub mod assignment;
pub mod driver;
pub mod idempotency_key;
pub mod payment;
pub mod ride;
pub mod trip;

pub use assignment::AssignmentRepository;
pub use driver::DriverRepository;
pub use idempotency_key::IdempotencyKeyRepository;
pub use payment::PaymentRepository;
pub use ride::{RideInput, RideRepository};
pub use trip::TripRepository;
