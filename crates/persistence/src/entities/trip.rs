//! Trip entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::error::DomainError;
use domain::models::{Trip, TripStatus};

/// Database row mapping for the `trips` table.
#[derive(Debug, Clone, FromRow)]
pub struct TripEntity {
    pub id: i64,
    pub ride_id: i64,
    pub driver_id: i64,
    pub status: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub fare: f64,
}

impl TryFrom<TripEntity> for Trip {
    type Error = DomainError;

    fn try_from(e: TripEntity) -> Result<Self, Self::Error> {
        let status: TripStatus = e
            .status
            .parse()
            .map_err(|err: String| DomainError::IllegalState(err))?;
        Ok(Trip {
            id: e.id,
            ride_id: e.ride_id,
            driver_id: e.driver_id,
            status,
            start_at: e.start_at,
            end_at: e.end_at,
            distance_km: e.distance_km,
            duration_sec: e.duration_sec,
            fare: e.fare,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str) -> TripEntity {
        TripEntity {
            id: 1,
            ride_id: 10,
            driver_id: 20,
            status: status.to_string(),
            start_at: Utc::now(),
            end_at: None,
            distance_km: 0.0,
            duration_sec: 0,
            fare: 0.0,
        }
    }

    #[test]
    fn ongoing_status_converts() {
        let trip: Trip = entity("ongoing").try_into().unwrap();
        assert_eq!(trip.status, TripStatus::Ongoing);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<Trip, _> = entity("bogus").try_into();
        assert!(result.is_err());
    }
}
