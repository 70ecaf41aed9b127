//! Ride repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::RideEntity;
use crate::metrics::QueryTimer;

/// Input data for inserting a ride.
#[derive(Debug, Clone)]
pub struct RideInput {
    pub rider_id: Option<i64>,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub destination_lat: f64,
    pub destination_lon: f64,
    pub tier: Option<String>,
    pub payment_method: Option<String>,
    pub status: String,
}

/// Repository for ride database operations.
#[derive(Clone)]
pub struct RideRepository {
    pool: PgPool,
}

impl RideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn insert(&self, input: RideInput) -> Result<RideEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_ride");
        let entity = sqlx::query_as::<_, RideEntity>(
            r#"
            INSERT INTO rides (
                rider_id, pickup_lat, pickup_lon, destination_lat, destination_lon,
                tier, payment_method, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, rider_id, pickup_lat, pickup_lon, destination_lat, destination_lon,
                      tier, payment_method, status, created_at
            "#,
        )
        .bind(input.rider_id)
        .bind(input.pickup_lat)
        .bind(input.pickup_lon)
        .bind(input.destination_lat)
        .bind(input.destination_lon)
        .bind(input.tier)
        .bind(input.payment_method)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity
    }

    pub async fn find_by_id(&self, ride_id: i64) -> Result<Option<RideEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ride_by_id");
        let result = sqlx::query_as::<_, RideEntity>(
            r#"
            SELECT id, rider_id, pickup_lat, pickup_lon, destination_lat, destination_lon,
                   tier, payment_method, status, created_at
            FROM rides
            WHERE id = $1
            "#,
        )
        .bind(ride_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update_status(&self, ride_id: i64, status: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_ride_status");
        let result = sqlx::query(
            r#"
            UPDATE rides SET status = $2 WHERE id = $1
            "#,
        )
        .bind(ride_id)
        .bind(status)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Same as [`Self::update_status`], but against a caller-owned
    /// transaction, so it can be composed with another repository's write
    /// into a single atomic operation (e.g. offering a ride also flips its
    /// status to `assigned`).
    pub async fn update_status_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ride_id: i64,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_ride_status");
        let result = sqlx::query(
            r#"
            UPDATE rides SET status = $2 WHERE id = $1
            "#,
        )
        .bind(ride_id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
