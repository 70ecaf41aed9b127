//! Driver repository for database operations.

use sqlx::PgPool;

use crate::entities::DriverEntity;
use crate::metrics::QueryTimer;

/// Repository for driver database operations.
#[derive(Clone)]
pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Auto-provisions a driver row on first location report.
    ///
    /// `ON CONFLICT DO NOTHING` keeps this idempotent across repeated
    /// location reports from the same driver.
    pub async fn ensure(&self, driver_id: i64) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("ensure_driver");
        sqlx::query(
            r#"
            INSERT INTO drivers (id, available)
            VALUES ($1, TRUE)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(driver_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    pub async fn find_by_id(&self, driver_id: i64) -> Result<Option<DriverEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_driver_by_id");
        let result = sqlx::query_as::<_, DriverEntity>(
            r#"
            SELECT id, available, name, created_at
            FROM drivers
            WHERE id = $1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
