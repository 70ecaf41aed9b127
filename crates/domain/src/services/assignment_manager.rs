//! Offer/accept/decline/expire state machine for ride assignments.
//!
//! The expiry race is resolved by the store's row lock, not by timer
//! cancellation: accept, decline and expire all attempt the same guarded
//! `Offered -> terminal` transition, and only one of them can ever observe
//! the row still `Offered`. Cancelling the timer on accept/decline is purely
//! a memory-reclamation optimization, not a correctness requirement.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::DomainError;
use crate::models::{Assignment, Trip};

use super::store::RideStore;

pub struct AssignmentManager {
    store: Arc<dyn RideStore>,
    ttl: Duration,
    timers: DashMap<i64, JoinHandle<()>>,
}

impl AssignmentManager {
    pub fn new(store: Arc<dyn RideStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            timers: DashMap::new(),
        }
    }

    /// Creates an `Offered` assignment and moves the ride to `Assigned` in
    /// one transaction (`RideStore::offer`), then schedules its expiry
    /// timer. The timer is armed only after that transaction has committed,
    /// never inside it.
    pub async fn offer(self: &Arc<Self>, ride_id: i64, driver_id: i64) -> Result<Assignment, DomainError> {
        let now = Utc::now();
        let assignment = self.store.offer(ride_id, driver_id, now).await?;
        self.schedule_expiry(assignment.id);
        Ok(assignment)
    }

    fn schedule_expiry(self: &Arc<Self>, assignment_id: i64) {
        let manager = Arc::clone(self);
        let ttl = self.ttl;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(err) = manager.expire(assignment_id).await {
                warn!(assignment_id, error = %err, "assignment expiry failed");
            }
            manager.timers.remove(&assignment_id);
        });
        self.timers.insert(assignment_id, handle);
    }

    fn cancel_timer(&self, assignment_id: i64) {
        if let Some((_, handle)) = self.timers.remove(&assignment_id) {
            handle.abort();
        }
    }

    /// Accepts an offer on behalf of `driver_id`, opening the trip on
    /// success — the transition and the trip insert are one `RideStore`
    /// transaction. Returns `CannotAccept` if the assignment is not
    /// `Offered` or is owned by a different driver — never an error for
    /// that case.
    pub async fn accept(
        self: &Arc<Self>,
        driver_id: i64,
        assignment_id: i64,
    ) -> Result<Trip, DomainError> {
        let now = Utc::now();
        let trip = self
            .store
            .accept_assignment(assignment_id, driver_id, now)
            .await?
            .ok_or_else(|| {
                DomainError::CannotAccept(format!(
                    "assignment {assignment_id} is not offered to driver {driver_id}"
                ))
            })?;

        self.cancel_timer(assignment_id);
        Ok(trip)
    }

    /// Declines an offer on behalf of `driver_id`, returning the ride to
    /// `Searching` so it can be re-matched — both in one `RideStore`
    /// transaction.
    pub async fn decline(
        self: &Arc<Self>,
        driver_id: i64,
        assignment_id: i64,
    ) -> Result<(), DomainError> {
        let applied = self.store.decline_assignment(assignment_id, driver_id).await?;
        if !applied {
            return Err(DomainError::CannotAccept(format!(
                "assignment {assignment_id} is not offered to driver {driver_id}"
            )));
        }

        self.cancel_timer(assignment_id);
        Ok(())
    }

    /// Expires an offer if it is still `Offered`. Idempotent: a call
    /// against an already-terminal assignment is a silent no-op, which is
    /// how a losing race against accept/decline resolves.
    pub async fn expire(self: &Arc<Self>, assignment_id: i64) -> Result<(), DomainError> {
        self.store.expire_assignment(assignment_id).await?;
        Ok(())
    }
}
