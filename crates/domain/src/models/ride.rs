//! Ride domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::assignment::AssignmentSummary;
use super::geo::Coordinate;

// ============================================================================
// Ride status
// ============================================================================

/// State of a ride in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Searching,
    Assigned,
    NoDriver,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Searching => "searching",
            RideStatus::Assigned => "assigned",
            RideStatus::NoDriver => "no_driver",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a ride may move from `self` into `target`.
    pub fn can_transition_to(&self, target: RideStatus) -> bool {
        matches!(
            (self, target),
            (RideStatus::Searching, RideStatus::Assigned)
                | (RideStatus::Searching, RideStatus::NoDriver)
                | (RideStatus::Searching, RideStatus::Cancelled)
                | (RideStatus::Assigned, RideStatus::Searching)
                | (RideStatus::Assigned, RideStatus::Cancelled)
                | (RideStatus::NoDriver, RideStatus::Searching)
                | (RideStatus::NoDriver, RideStatus::Cancelled)
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "searching" => Ok(RideStatus::Searching),
            "assigned" => Ok(RideStatus::Assigned),
            "no_driver" => Ok(RideStatus::NoDriver),
            "cancelled" => Ok(RideStatus::Cancelled),
            _ => Err(format!(
                "invalid ride status: {s}. must be one of: searching, assigned, no_driver, cancelled"
            )),
        }
    }
}

// ============================================================================
// Core model
// ============================================================================

/// A ride request and its current coordination state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// DTOs
// ============================================================================

/// Request payload for `POST /v1/rides`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,

    #[validate(nested)]
    pub pickup: Coordinate,

    #[validate(nested)]
    pub destination: Coordinate,

    pub tier: Option<String>,
    pub payment_method: Option<String>,
}

/// Response payload for ride creation and lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideOut {
    pub id: i64,
    pub status: RideStatus,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentSummary>,
}

impl From<Ride> for RideOut {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            status: ride.status,
            pickup: ride.pickup,
            destination: ride.destination,
            assignment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_status_round_trips_through_str() {
        for s in [
            RideStatus::Searching,
            RideStatus::Assigned,
            RideStatus::NoDriver,
            RideStatus::Cancelled,
        ] {
            let parsed: RideStatus = s.as_str().parse().unwrap();
            assert_eq!(parsed, s);
        }
    }

    #[test]
    fn ride_status_from_str_rejects_unknown() {
        assert!("bogus".parse::<RideStatus>().is_err());
    }

    #[test]
    fn ride_status_serializes_lowercase() {
        let json = serde_json::to_string(&RideStatus::NoDriver).unwrap();
        assert_eq!(json, "\"no_driver\"");
    }

    #[test]
    fn searching_can_move_to_assigned_or_no_driver() {
        assert!(RideStatus::Searching.can_transition_to(RideStatus::Assigned));
        assert!(RideStatus::Searching.can_transition_to(RideStatus::NoDriver));
    }

    #[test]
    fn assigned_can_fall_back_to_searching() {
        assert!(RideStatus::Assigned.can_transition_to(RideStatus::Searching));
        assert!(!RideStatus::Assigned.can_transition_to(RideStatus::NoDriver));
    }

    #[test]
    fn create_ride_request_rejects_invalid_pickup() {
        let req = CreateRideRequest {
            rider_id: None,
            pickup: Coordinate::new(200.0, 0.0),
            destination: Coordinate::new(0.0, 0.0),
            tier: None,
            payment_method: None,
        };
        assert!(req.validate().is_err());
    }
}
