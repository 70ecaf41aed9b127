//! Trip repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::TripEntity;
use crate::metrics::QueryTimer;

/// Repository for trip database operations.
#[derive(Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts an `Ongoing` trip against a caller-owned transaction, so it
    /// can be composed with the assignment-acceptance transition that must
    /// commit alongside it (§4.4 Accept).
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ride_id: i64,
        driver_id: i64,
        start_at: DateTime<Utc>,
    ) -> Result<TripEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_trip");
        let entity = sqlx::query_as::<_, TripEntity>(
            r#"
            INSERT INTO trips (ride_id, driver_id, status, start_at, distance_km, duration_sec, fare)
            VALUES ($1, $2, 'ongoing', $3, 0, 0, 0)
            RETURNING id, ride_id, driver_id, status, start_at, end_at, distance_km, duration_sec, fare
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(start_at)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        entity
    }

    pub async fn find_by_id(&self, trip_id: i64) -> Result<Option<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_trip_by_id");
        let result = sqlx::query_as::<_, TripEntity>(
            r#"
            SELECT id, ride_id, driver_id, status, start_at, end_at, distance_km, duration_sec, fare
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Marks a trip `Completed` with the computed fields against a
    /// caller-owned transaction, so it can be composed with the payment
    /// insert that must commit alongside it (§4.5 step 5). Guarded by
    /// `WHERE status = 'ongoing'` so a trip cannot be closed twice; returns
    /// `None` (not an error) if the guard failed.
    pub async fn complete_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        trip_id: i64,
        distance_km: f64,
        duration_sec: i64,
        fare: f64,
        end_at: DateTime<Utc>,
    ) -> Result<Option<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("complete_trip");
        let result = sqlx::query_as::<_, TripEntity>(
            r#"
            UPDATE trips
            SET status = 'completed', distance_km = $2, duration_sec = $3, fare = $4, end_at = $5
            WHERE id = $1 AND status = 'ongoing'
            RETURNING id, ride_id, driver_id, status, start_at, end_at, distance_km, duration_sec, fare
            "#,
        )
        .bind(trip_id)
        .bind(distance_km)
        .bind(duration_sec)
        .bind(fare)
        .bind(end_at)
        .fetch_optional(&mut **tx)
        .await;
        timer.record();
        result
    }
}
