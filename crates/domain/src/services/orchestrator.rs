//! Façade composing Matcher + AssignmentManager + Store into the
//! `create_ride` use case.

use std::sync::Arc;

use crate::error::DomainError;
use crate::models::{CreateRideRequest, RideOut, RideStatus};

use super::assignment_manager::AssignmentManager;
use super::matcher::Matcher;
use super::store::{IdempotencyClaim, NewRide, RideStore};

pub struct RideOrchestrator {
    store: Arc<dyn RideStore>,
    matcher: Arc<Matcher>,
    assignment_manager: Arc<AssignmentManager>,
    match_radius_km: f64,
}

impl RideOrchestrator {
    pub fn new(
        store: Arc<dyn RideStore>,
        matcher: Arc<Matcher>,
        assignment_manager: Arc<AssignmentManager>,
        match_radius_km: f64,
    ) -> Self {
        Self {
            store,
            matcher,
            assignment_manager,
            match_radius_km,
        }
    }

    /// Creates a ride, matches it to the nearest eligible driver, and offers
    /// it if one was found. `idempotency_key`, when present, makes repeated
    /// calls with the same key return the first call's response unchanged.
    pub async fn create_ride(
        &self,
        request: CreateRideRequest,
        idempotency_key: Option<&str>,
    ) -> Result<RideOut, DomainError> {
        if let Some(key) = idempotency_key {
            if let IdempotencyClaim::Cached(cached) = self.store.claim_idempotency_key(key).await? {
                return serde_json::from_value(cached)
                    .map_err(|e| DomainError::Conflict(format!("cached response unreadable: {e}")));
            }
        }

        let ride = self
            .store
            .insert_ride(NewRide {
                rider_id: request.rider_id,
                pickup: request.pickup,
                destination: request.destination,
                tier: request.tier,
                payment_method: request.payment_method,
            })
            .await?;

        let final_status = match self
            .matcher
            .find_nearest(ride.pickup, self.match_radius_km)
            .await
        {
            Some(driver_id) => match self.assignment_manager.offer(ride.id, driver_id).await {
                Ok(_assignment) => RideStatus::Assigned,
                Err(_) => {
                    self.store.update_ride_status(ride.id, RideStatus::NoDriver).await?;
                    RideStatus::NoDriver
                }
            },
            None => {
                self.store.update_ride_status(ride.id, RideStatus::NoDriver).await?;
                RideStatus::NoDriver
            }
        };

        let ride_out = RideOut {
            id: ride.id,
            status: final_status,
            pickup: ride.pickup,
            destination: ride.destination,
            assignment: None,
        };

        if let Some(key) = idempotency_key {
            let value = serde_json::to_value(&ride_out)
                .map_err(|e| DomainError::Conflict(format!("response not serializable: {e}")))?;
            self.store.store_idempotency_response(key, value).await?;
        }

        Ok(ride_out)
    }
}
