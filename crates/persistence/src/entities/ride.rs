//! Ride entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::error::DomainError;
use domain::models::{Coordinate, Ride, RideStatus};

/// Database row mapping for the `rides` table.
///
/// Coordinates are stored as plain `DOUBLE PRECISION` columns rather than a
/// PostGIS geography type: the matching pipeline works exclusively through
/// the in-process `GeoIndex`, so the Store never needs to run a spatial
/// query against this table.
#[derive(Debug, Clone, FromRow)]
pub struct RideEntity {
    pub id: i64,
    pub rider_id: Option<i64>,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub destination_lat: f64,
    pub destination_lon: f64,
    pub tier: Option<String>,
    pub payment_method: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RideEntity> for Ride {
    type Error = DomainError;

    fn try_from(e: RideEntity) -> Result<Self, Self::Error> {
        let status: RideStatus = e
            .status
            .parse()
            .map_err(|err: String| DomainError::IllegalState(err))?;
        Ok(Ride {
            id: e.id,
            rider_id: e.rider_id,
            pickup: Coordinate::new(e.pickup_lat, e.pickup_lon),
            destination: Coordinate::new(e.destination_lat, e.destination_lon),
            tier: e.tier,
            payment_method: e.payment_method,
            status,
            created_at: e.created_at,
        })
    }
}
