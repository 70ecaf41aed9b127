//! Assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::error::DomainError;
use domain::models::{Assignment, AssignmentStatus};

/// Database row mapping for the `assignments` table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: i64,
    pub ride_id: i64,
    pub driver_id: i64,
    pub status: String,
    pub offered_at: DateTime<Utc>,
}

impl TryFrom<AssignmentEntity> for Assignment {
    type Error = DomainError;

    fn try_from(e: AssignmentEntity) -> Result<Self, Self::Error> {
        let status: AssignmentStatus = e
            .status
            .parse()
            .map_err(|err: String| DomainError::IllegalState(err))?;
        Ok(Assignment {
            id: e.id,
            ride_id: e.ride_id,
            driver_id: e.driver_id,
            status,
            offered_at: e.offered_at,
        })
    }
}
