//! The matching/assignment/trip/payment coordination pipeline.

pub mod assignment_manager;
pub mod geo_index;
pub mod matcher;
pub mod orchestrator;
pub mod payment_settler;
pub mod store;
pub mod trip_manager;

pub use assignment_manager::AssignmentManager;
pub use geo_index::{DriverId, GeoIndex, InMemoryGeoIndex};
pub use matcher::Matcher;
pub use orchestrator::RideOrchestrator;
pub use payment_settler::{PaymentProvider, PaymentSettler, SimulatedPaymentProvider};
pub use store::{IdempotencyClaim, NewRide, RideStore};
pub use trip_manager::TripManager;
