//! Persistence seam between the business-logic services and whatever backs
//! them (PostgreSQL in `persistence`, an in-memory fake in tests).
//!
//! Kept framework-agnostic (no `sqlx` types in the signatures) so the
//! matching/assignment/trip/payment services never need to know their
//! storage is relational.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::models::{Assignment, Payment, PaymentStatus, Ride, RideStatus, Trip};

/// Fields needed to insert a new ride; mirrors `CreateRideRequest` without
/// tying the store to the HTTP DTO.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub rider_id: Option<i64>,
    pub pickup: crate::models::Coordinate,
    pub destination: crate::models::Coordinate,
    pub tier: Option<String>,
    pub payment_method: Option<String>,
}

/// Outcome of claiming an idempotency key.
#[derive(Debug, Clone)]
pub enum IdempotencyClaim {
    /// This caller is the first to present `key`; it owns producing the response.
    Fresh,
    /// `key` was already claimed; here is the response the first caller stored.
    Cached(serde_json::Value),
}

/// Transactional persistence for rides, assignments, trips, payments and
/// idempotency keys.
///
/// Every method that performs a multi-row transition (offer, accept,
/// decline, expire, trip close) runs as a single database transaction at
/// the implementation layer — the trait exposes only the compound
/// operation, never the individual inserts/updates it is built from, so a
/// caller cannot accidentally split one across two transactions.
#[async_trait::async_trait]
pub trait RideStore: Send + Sync {
    async fn insert_ride(&self, ride: NewRide) -> Result<Ride, DomainError>;
    async fn get_ride(&self, ride_id: i64) -> Result<Ride, DomainError>;
    async fn update_ride_status(&self, ride_id: i64, status: RideStatus) -> Result<(), DomainError>;

    async fn get_assignment(&self, assignment_id: i64) -> Result<Assignment, DomainError>;
    /// Returns the most recent assignment for a ride, if any — used to embed
    /// an `AssignmentSummary` in `GET /v1/rides/{id}`.
    async fn get_assignment_for_ride(&self, ride_id: i64) -> Result<Option<Assignment>, DomainError>;

    /// Creates an `Offered` assignment and moves the ride to `Assigned` in
    /// one transaction (§4.4 Offer).
    async fn offer(
        &self,
        ride_id: i64,
        driver_id: i64,
        offered_at: DateTime<Utc>,
    ) -> Result<Assignment, DomainError>;

    /// Accepts an offer on behalf of `driver_id` and opens its trip in one
    /// transaction (§4.4 Accept). Returns `None` — not an error — if the
    /// assignment was not `Offered` to `driver_id`, which is how a losing
    /// race against `expire_assignment`/`decline_assignment` resolves.
    async fn accept_assignment(
        &self,
        assignment_id: i64,
        driver_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, DomainError>;

    /// Declines an offer on behalf of `driver_id` and returns its ride to
    /// `Searching` in one transaction. Returns `false` if the assignment was
    /// not `Offered` to `driver_id`.
    async fn decline_assignment(&self, assignment_id: i64, driver_id: i64) -> Result<bool, DomainError>;

    /// Expires an offer, if still `Offered`, and returns its ride to
    /// `Searching` in one transaction (§4.4 Expire). Idempotent: `false` if
    /// the assignment was already terminal.
    async fn expire_assignment(&self, assignment_id: i64) -> Result<bool, DomainError>;

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, DomainError>;

    /// Marks a trip `Completed` with the computed fields and inserts its
    /// `Pending` payment in one transaction (§4.5 step 5).
    #[allow(clippy::too_many_arguments)]
    async fn close_trip(
        &self,
        trip_id: i64,
        distance_km: f64,
        duration_sec: i64,
        fare: f64,
        end_at: DateTime<Utc>,
    ) -> Result<(Trip, Payment), DomainError>;

    async fn get_payment(&self, payment_id: i64) -> Result<Payment, DomainError>;
    /// Returns the most recently created payment for a trip, if any.
    async fn get_latest_payment_for_trip(&self, trip_id: i64) -> Result<Option<Payment>, DomainError>;
    /// Transitions a payment out of `Pending`. Guarded by `WHERE status =
    /// 'pending'` at the implementation layer so settlement is idempotent:
    /// returns `false` if the payment was already terminal.
    async fn settle_payment(
        &self,
        payment_id: i64,
        status: PaymentStatus,
        provider_response: serde_json::Value,
    ) -> Result<bool, DomainError>;

    /// Claims an idempotency key, or reports the cached response of whoever
    /// claimed it first. Linearizable: the unique constraint on `key`
    /// guarantees at most one concurrent caller is told `Fresh`; every other
    /// caller waits for that winner's response to be stored.
    async fn claim_idempotency_key(&self, key: &str) -> Result<IdempotencyClaim, DomainError>;
    /// Stores the response for a previously claimed key.
    async fn store_idempotency_response(
        &self,
        key: &str,
        response: serde_json::Value,
    ) -> Result<(), DomainError>;

    /// Auto-provisions a driver row on its first location report.
    async fn ensure_driver(&self, driver_id: i64) -> Result<(), DomainError>;
}
