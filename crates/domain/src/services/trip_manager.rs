//! Closes trips, computing fare on close.
//!
//! Opening a trip is not a separate operation here: it happens inside the
//! same transaction as the assignment acceptance that creates it (see
//! `RideStore::accept_assignment`), so there is no window where an
//! `Accepted` assignment exists without its `Trip`.

use std::sync::Arc;

use chrono::Utc;

use crate::error::DomainError;
use crate::models::{compute_fare, haversine_km, Coordinate, EndTripResponse, TripStatus};

use super::geo_index::GeoIndex;
use super::payment_settler::PaymentSettler;
use super::store::RideStore;

pub struct TripManager {
    store: Arc<dyn RideStore>,
    geo_index: Arc<dyn GeoIndex>,
    payment_settler: Arc<PaymentSettler>,
}

impl TripManager {
    pub fn new(
        store: Arc<dyn RideStore>,
        geo_index: Arc<dyn GeoIndex>,
        payment_settler: Arc<PaymentSettler>,
    ) -> Self {
        Self {
            store,
            geo_index,
            payment_settler,
        }
    }

    /// Closes a trip: computes distance/duration/fare, then marks the trip
    /// `Completed` and creates its `Pending` payment in one transaction
    /// (`RideStore::close_trip`), before handing the payment off to the
    /// settler.
    ///
    /// Distance uses the driver's currently cached GeoIndex position as the
    /// start-side reference rather than a persisted trip-start location —
    /// a known simplification, preserved for parity with the behavior this
    /// was distilled from rather than silently fixed.
    pub async fn close(
        &self,
        trip_id: i64,
        end_location: Option<Coordinate>,
    ) -> Result<EndTripResponse, DomainError> {
        let trip = self.store.get_trip(trip_id).await?;
        if trip.status != TripStatus::Ongoing {
            return Err(DomainError::IllegalState(format!(
                "trip {trip_id} is not ongoing"
            )));
        }

        let now = Utc::now();
        let distance_km = match (end_location, self.geo_index.get(trip.driver_id).await) {
            (Some(end), Some(reference)) => haversine_km(reference, end),
            _ => trip.distance_km,
        };
        let duration_sec = (now - trip.start_at).num_seconds().max(0);
        let fare = compute_fare(distance_km, duration_sec);

        let (completed, payment) = self
            .store
            .close_trip(trip_id, distance_km, duration_sec, fare, now)
            .await?;

        self.payment_settler.enqueue(payment.id);

        Ok(EndTripResponse {
            trip_id: completed.id,
            fare: completed.fare,
            status: completed.status,
        })
    }
}
