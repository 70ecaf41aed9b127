//! Ride endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use domain::models::{CreateRideRequest, RideOut};
use domain::services::RideStore;
use shared::validation::validate_positive_id;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalIdempotencyKey;

/// `POST /v1/rides` — creates a ride and attempts to match it to a nearby
/// driver. Idempotent: a repeated call with the same `Idempotency-Key`
/// header returns the first call's response unchanged.
pub async fn create_ride(
    State(state): State<AppState>,
    OptionalIdempotencyKey(idempotency_key): OptionalIdempotencyKey,
    Json(request): Json<CreateRideRequest>,
) -> Result<Json<RideOut>, ApiError> {
    request.validate()?;

    let ride_out = state
        .orchestrator
        .create_ride(request, idempotency_key.as_deref())
        .await?;

    Ok(Json(ride_out))
}

/// `GET /v1/rides/{id}` — returns a ride together with its most recent
/// assignment, if any has been offered.
pub async fn get_ride(
    State(state): State<AppState>,
    Path(ride_id): Path<i64>,
) -> Result<Json<RideOut>, ApiError> {
    validate_positive_id(ride_id, "ride_id").map_err(ApiError::Validation)?;

    let ride = state.store.get_ride(ride_id).await?;
    let assignment = state.store.get_assignment_for_ride(ride_id).await?;

    let mut ride_out: RideOut = ride.into();
    ride_out.assignment = assignment.map(Into::into);

    Ok(Json(ride_out))
}
