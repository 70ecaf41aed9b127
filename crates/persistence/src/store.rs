//! `PgStore` — the PostgreSQL-backed implementation of `domain::services::store::RideStore`.
//!
//! Single-row reads and writes are thin glue over a repository call. The
//! compound transitions (offer, accept, decline, expire, trip close) each
//! open one `pool.begin()`, compose two or three `_in_tx` repository calls
//! against it, and `commit()` — so the transaction boundary lives here, at
//! the trait-implementation layer, exactly where the trait's doc comment
//! says it must.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::error::DomainError;
use domain::models::{Payment, PaymentStatus, Ride, RideStatus, Trip};
use domain::services::store::{IdempotencyClaim, NewRide, RideStore};

use crate::repositories::{
    AssignmentRepository, DriverRepository, IdempotencyKeyRepository, PaymentRepository,
    RideInput, RideRepository, TripRepository,
};

/// How long a loser of the idempotency-key race waits between polls of the
/// winner's stored response, and how many times it polls before giving up.
const IDEMPOTENCY_POLL_INTERVAL: Duration = Duration::from_millis(20);
const IDEMPOTENCY_MAX_POLLS: u32 = 150; // ~3s

/// Transactional persistence for the coordination core, backed by a shared
/// `sqlx::PgPool`. Each repository owns the same pool; multi-row
/// transitions are composed into a single transaction here.
#[derive(Clone)]
pub struct PgStore {
    rides: RideRepository,
    assignments: AssignmentRepository,
    trips: TripRepository,
    payments: PaymentRepository,
    idempotency_keys: IdempotencyKeyRepository,
    drivers: DriverRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            rides: RideRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            idempotency_keys: IdempotencyKeyRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl RideStore for PgStore {
    async fn insert_ride(&self, ride: NewRide) -> Result<Ride, DomainError> {
        let entity = self
            .rides
            .insert(RideInput {
                rider_id: ride.rider_id,
                pickup_lat: ride.pickup.lat,
                pickup_lon: ride.pickup.lon,
                destination_lat: ride.destination.lat,
                destination_lon: ride.destination.lon,
                tier: ride.tier,
                payment_method: ride.payment_method,
                status: RideStatus::Searching.as_str().to_string(),
            })
            .await?;
        entity.try_into()
    }

    async fn get_ride(&self, ride_id: i64) -> Result<Ride, DomainError> {
        let entity = self
            .rides
            .find_by_id(ride_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("ride {ride_id} not found")))?;
        entity.try_into()
    }

    async fn update_ride_status(&self, ride_id: i64, status: RideStatus) -> Result<(), DomainError> {
        let affected = self.rides.update_status(ride_id, status.as_str()).await?;
        if affected == 0 {
            return Err(DomainError::NotFound(format!("ride {ride_id} not found")));
        }
        Ok(())
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<domain::models::Assignment, DomainError> {
        let entity = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("assignment {assignment_id} not found")))?;
        entity.try_into()
    }

    async fn get_assignment_for_ride(
        &self,
        ride_id: i64,
    ) -> Result<Option<domain::models::Assignment>, DomainError> {
        match self.assignments.find_latest_by_ride(ride_id).await? {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn offer(
        &self,
        ride_id: i64,
        driver_id: i64,
        offered_at: DateTime<Utc>,
    ) -> Result<domain::models::Assignment, DomainError> {
        let mut tx = self.rides.pool().begin().await?;
        let assignment = self
            .assignments
            .insert_in_tx(&mut tx, ride_id, driver_id, offered_at)
            .await?;
        self.rides
            .update_status_in_tx(&mut tx, ride_id, RideStatus::Assigned.as_str())
            .await?;
        tx.commit().await?;
        assignment.try_into()
    }

    async fn accept_assignment(
        &self,
        assignment_id: i64,
        driver_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, DomainError> {
        let mut tx = self.rides.pool().begin().await?;
        let Some(updated) = self
            .assignments
            .transition_in_tx(&mut tx, assignment_id, Some(driver_id), "offered", "accepted")
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let trip = self
            .trips
            .insert_in_tx(&mut tx, updated.ride_id, driver_id, now)
            .await?;
        tx.commit().await?;
        Ok(Some(trip.try_into()?))
    }

    async fn decline_assignment(&self, assignment_id: i64, driver_id: i64) -> Result<bool, DomainError> {
        let mut tx = self.rides.pool().begin().await?;
        let Some(updated) = self
            .assignments
            .transition_in_tx(&mut tx, assignment_id, Some(driver_id), "offered", "declined")
            .await?
        else {
            tx.rollback().await?;
            return Ok(false);
        };

        self.rides
            .update_status_in_tx(&mut tx, updated.ride_id, RideStatus::Searching.as_str())
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn expire_assignment(&self, assignment_id: i64) -> Result<bool, DomainError> {
        let mut tx = self.rides.pool().begin().await?;
        let Some(updated) = self
            .assignments
            .transition_in_tx(&mut tx, assignment_id, None, "offered", "expired")
            .await?
        else {
            tx.rollback().await?;
            return Ok(false);
        };

        self.rides
            .update_status_in_tx(&mut tx, updated.ride_id, RideStatus::Searching.as_str())
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, DomainError> {
        let entity = self
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("trip {trip_id} not found")))?;
        entity.try_into()
    }

    async fn close_trip(
        &self,
        trip_id: i64,
        distance_km: f64,
        duration_sec: i64,
        fare: f64,
        end_at: DateTime<Utc>,
    ) -> Result<(Trip, Payment), DomainError> {
        let mut tx = self.trips.pool().begin().await?;
        let Some(completed) = self
            .trips
            .complete_in_tx(&mut tx, trip_id, distance_km, duration_sec, fare, end_at)
            .await?
        else {
            tx.rollback().await?;
            return Err(DomainError::IllegalState(format!(
                "trip {trip_id} is not ongoing"
            )));
        };

        let payment = self.payments.insert_in_tx(&mut tx, trip_id, fare).await?;
        tx.commit().await?;
        Ok((completed.try_into()?, payment.try_into()?))
    }

    async fn get_payment(&self, payment_id: i64) -> Result<Payment, DomainError> {
        let entity = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("payment {payment_id} not found")))?;
        entity.try_into()
    }

    async fn get_latest_payment_for_trip(&self, trip_id: i64) -> Result<Option<Payment>, DomainError> {
        match self.payments.find_latest_by_trip(trip_id).await? {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn settle_payment(
        &self,
        payment_id: i64,
        status: PaymentStatus,
        provider_response: serde_json::Value,
    ) -> Result<bool, DomainError> {
        let applied = self
            .payments
            .settle(payment_id, status.as_str(), provider_response)
            .await?;
        Ok(applied)
    }

    async fn claim_idempotency_key(&self, key: &str) -> Result<IdempotencyClaim, DomainError> {
        if self.idempotency_keys.insert_if_absent(key).await?.is_some() {
            return Ok(IdempotencyClaim::Fresh);
        }

        for _ in 0..IDEMPOTENCY_MAX_POLLS {
            if let Some(response) = self.idempotency_keys.find_response(key).await? {
                return Ok(IdempotencyClaim::Cached(response));
            }
            tokio::time::sleep(IDEMPOTENCY_POLL_INTERVAL).await;
        }

        Err(DomainError::BackendUnavailable(format!(
            "timed out waiting for idempotency key {key} response"
        )))
    }

    async fn store_idempotency_response(
        &self,
        key: &str,
        response: serde_json::Value,
    ) -> Result<(), DomainError> {
        self.idempotency_keys.store_response(key, response).await?;
        Ok(())
    }

    async fn ensure_driver(&self, driver_id: i64) -> Result<(), DomainError> {
        self.drivers.ensure(driver_id).await?;
        Ok(())
    }
}
