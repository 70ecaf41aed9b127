//! Payment endpoint handlers.

use axum::{extract::State, Json};
use chrono::Utc;

use domain::models::{PaymentStatus, Receipt, TriggerPaymentRequest};
use domain::services::RideStore;
use shared::validation::validate_positive_id;

use crate::app::AppState;
use crate::error::ApiError;

/// `POST /v1/payments` — looks up the most recent payment for a trip and
/// returns its receipt, re-triggering settlement if it is still pending.
pub async fn trigger_payment(
    State(state): State<AppState>,
    Json(request): Json<TriggerPaymentRequest>,
) -> Result<Json<Receipt>, ApiError> {
    validate_positive_id(request.trip_id, "trip_id").map_err(ApiError::Validation)?;

    let payment = state
        .store
        .get_latest_payment_for_trip(request.trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("payment not found for trip {}", request.trip_id)))?;

    let trip = state.store.get_trip(request.trip_id).await?;
    let ride = state.store.get_ride(trip.ride_id).await?;

    if payment.status == PaymentStatus::Pending {
        state.payment_settler.enqueue(payment.id);
    }

    Ok(Json(Receipt {
        payment_id: payment.id,
        trip_id: trip.id,
        rider_id: ride.rider_id,
        driver_id: trip.driver_id,
        amount: payment.amount,
        payment_method: ride.payment_method,
        status: payment.status,
        distance_km: trip.distance_km,
        duration_sec: trip.duration_sec,
        pickup: ride.pickup,
        destination: ride.destination,
        timestamp: Utc::now(),
    }))
}
