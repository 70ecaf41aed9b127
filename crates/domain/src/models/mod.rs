//! Domain models for the ride coordination core.

pub mod assignment;
pub mod driver;
pub mod geo;
pub mod idempotency;
pub mod payment;
pub mod ride;
pub mod trip;

pub use assignment::{Assignment, AssignmentActionRequest, AssignmentStatus, AssignmentSummary};
pub use driver::{Driver, DriverPosition, LocationUpdateRequest};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use idempotency::IdempotencyRecord;
pub use payment::{
    simulated_provider_response, Payment, PaymentStatus, Receipt, TriggerPaymentRequest,
};
pub use ride::{CreateRideRequest, Ride, RideOut, RideStatus};
pub use trip::{compute_fare, EndTripRequest, EndTripResponse, Trip, TripStatus};
