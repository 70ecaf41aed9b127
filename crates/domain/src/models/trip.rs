//! Trip domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::Coordinate;

// ============================================================================
// Trip status
// ============================================================================

/// State of a trip in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Ongoing,
    Paused,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Ongoing => "ongoing",
            TripStatus::Paused => "paused",
            TripStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, target: TripStatus) -> bool {
        matches!(
            (self, target),
            (TripStatus::Ongoing, TripStatus::Paused)
                | (TripStatus::Ongoing, TripStatus::Completed)
                | (TripStatus::Paused, TripStatus::Ongoing)
                | (TripStatus::Paused, TripStatus::Completed)
        )
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(TripStatus::Ongoing),
            "paused" => Ok(TripStatus::Paused),
            "completed" => Ok(TripStatus::Completed),
            _ => Err(format!(
                "invalid trip status: {s}. must be one of: ongoing, paused, completed"
            )),
        }
    }
}

// ============================================================================
// Core model
// ============================================================================

/// A trip opened from an accepted assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub ride_id: i64,
    pub driver_id: i64,
    pub status: TripStatus,
    pub start_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub fare: f64,
}

/// Request payload for `POST /v1/trips/{id}/end`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndTripRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lon: Option<f64>,
}

impl EndTripRequest {
    pub fn end_location(&self) -> Option<Coordinate> {
        match (self.end_lat, self.end_lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

/// Response payload for `POST /v1/trips/{id}/end`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTripResponse {
    pub trip_id: i64,
    pub fare: f64,
    pub status: TripStatus,
}

/// Computes the fare for a completed trip.
///
/// `2.0 + distance_km * 1.5 + (duration_sec / 60) * 0.2` — the flat-rate plus
/// per-kilometer plus per-minute formula the payment receipt relies on.
pub fn compute_fare(distance_km: f64, duration_sec: i64) -> f64 {
    2.0 + distance_km * 1.5 + (duration_sec as f64 / 60.0) * 0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ongoing_transitions_to_completed() {
        assert!(TripStatus::Ongoing.can_transition_to(TripStatus::Completed));
        assert!(!TripStatus::Completed.can_transition_to(TripStatus::Ongoing));
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in [TripStatus::Ongoing, TripStatus::Paused, TripStatus::Completed] {
            assert_eq!(s.as_str().parse::<TripStatus>().unwrap(), s);
        }
    }

    #[test]
    fn fare_formula_matches_zero_distance_zero_duration() {
        assert!((compute_fare(0.0, 0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fare_formula_matches_expected_components() {
        // 5 km, 10 minutes (600s): 2.0 + 5*1.5 + 10*0.2 = 2.0 + 7.5 + 2.0 = 11.5
        let fare = compute_fare(5.0, 600);
        assert!((fare - 11.5).abs() < 1e-9);
    }

    #[test]
    fn end_trip_request_without_coordinates_has_no_end_location() {
        let req = EndTripRequest::default();
        assert!(req.end_location().is_none());
    }

    #[test]
    fn end_trip_request_with_both_coordinates_has_end_location() {
        let req = EndTripRequest {
            end_lat: Some(12.97),
            end_lon: Some(77.6),
        };
        assert!(req.end_location().is_some());
    }
}
