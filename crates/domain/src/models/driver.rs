//! Driver domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::Coordinate;

/// A driver registered with the platform.
///
/// Drivers are auto-provisioned on their first location report (see
/// `RideOrchestrator`'s counterpart in the location-update handler); there is
/// no separate registration flow in this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The most recently reported position of a driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPosition {
    pub driver_id: i64,
    pub position: Coordinate,
    pub updated_at: DateTime<Utc>,
}

impl DriverPosition {
    /// A position is stale once it is older than `max_age`; stale positions
    /// are treated as absent by the GeoIndex.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now - self.updated_at <= max_age
    }
}

/// Request body for `POST /v1/drivers/{id}/location`.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdateRequest {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub lat: f64,
    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_fresh_within_max_age() {
        let pos = DriverPosition {
            driver_id: 1,
            position: Coordinate::new(0.0, 0.0),
            updated_at: Utc::now() - chrono::Duration::seconds(60),
        };
        assert!(pos.is_fresh(Utc::now(), chrono::Duration::seconds(300)));
    }

    #[test]
    fn position_is_stale_past_max_age() {
        let pos = DriverPosition {
            driver_id: 1,
            position: Coordinate::new(0.0, 0.0),
            updated_at: Utc::now() - chrono::Duration::seconds(301),
        };
        assert!(!pos.is_fresh(Utc::now(), chrono::Duration::seconds(300)));
    }
}
