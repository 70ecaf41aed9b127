//! Trip endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use domain::models::{EndTripRequest, EndTripResponse};
use shared::validation::validate_positive_id;

use crate::app::AppState;
use crate::error::ApiError;

/// `POST /v1/trips/{id}/end` — closes an ongoing trip, computes its fare,
/// and schedules payment settlement.
pub async fn end_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(request): Json<EndTripRequest>,
) -> Result<Json<EndTripResponse>, ApiError> {
    validate_positive_id(trip_id, "trip_id").map_err(ApiError::Validation)?;

    let response = state
        .trip_manager
        .close(trip_id, request.end_location())
        .await?;

    Ok(Json(response))
}
