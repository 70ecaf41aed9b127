//! Driver endpoint handlers: location reporting and assignment responses.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use domain::models::{AssignmentActionRequest, Coordinate, LocationUpdateRequest};
use domain::services::{GeoIndex, RideStore};
use shared::validation::validate_positive_id;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub trip_id: i64,
    pub status: domain::models::TripStatus,
}

/// `POST /v1/drivers/{id}/location` — records a driver's current position
/// and auto-provisions the driver row on first report.
pub async fn update_location(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
    Json(request): Json<LocationUpdateRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    validate_positive_id(driver_id, "driver_id").map_err(ApiError::Validation)?;
    request.validate()?;

    state.store.ensure_driver(driver_id).await?;
    state
        .geo_index
        .upsert(driver_id, Coordinate::new(request.lat, request.lon))
        .await?;

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// `POST /v1/drivers/{id}/accept` — accepts an offered assignment, opening
/// a trip on success.
pub async fn accept(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
    Json(request): Json<AssignmentActionRequest>,
) -> Result<Json<AcceptResponse>, ApiError> {
    validate_positive_id(driver_id, "driver_id").map_err(ApiError::Validation)?;

    let trip = state
        .assignment_manager
        .accept(driver_id, request.assignment_id)
        .await?;

    Ok(Json(AcceptResponse {
        trip_id: trip.id,
        status: trip.status,
    }))
}

/// `POST /v1/drivers/{id}/decline` — declines an offered assignment,
/// returning the ride to `searching`.
pub async fn decline(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
    Json(request): Json<AssignmentActionRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    validate_positive_id(driver_id, "driver_id").map_err(ApiError::Validation)?;

    state
        .assignment_manager
        .decline(driver_id, request.assignment_id)
        .await?;

    Ok(Json(StatusResponse {
        status: "declined".to_string(),
    }))
}
