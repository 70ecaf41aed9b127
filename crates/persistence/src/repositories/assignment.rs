//! Assignment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::AssignmentEntity;
use crate::metrics::QueryTimer;

/// Repository for assignment database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts an `Offered` assignment against a caller-owned transaction,
    /// so it can be composed with the ride-status update that must commit
    /// alongside it (§4.4 Offer).
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ride_id: i64,
        driver_id: i64,
        offered_at: DateTime<Utc>,
    ) -> Result<AssignmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_assignment");
        let entity = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            INSERT INTO assignments (ride_id, driver_id, status, offered_at)
            VALUES ($1, $2, 'offered', $3)
            RETURNING id, ride_id, driver_id, status, offered_at
            "#,
        )
        .bind(ride_id)
        .bind(driver_id)
        .bind(offered_at)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        entity
    }

    pub async fn find_by_id(&self, assignment_id: i64) -> Result<Option<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_assignment_by_id");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT id, ride_id, driver_id, status, offered_at
            FROM assignments
            WHERE id = $1
            "#,
        )
        .bind(assignment_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the most recently created assignment for a ride, if any.
    pub async fn find_latest_by_ride(
        &self,
        ride_id: i64,
    ) -> Result<Option<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_assignment_by_ride");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT id, ride_id, driver_id, status, offered_at
            FROM assignments
            WHERE ride_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(ride_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Transitions an assignment from `from_status` to `to_status`,
    /// optionally guarded on the owning driver, against a caller-owned
    /// transaction. The `SELECT ... FOR UPDATE` row lock is taken in that
    /// transaction, so a concurrent accept/decline/expire on the same row
    /// can never both apply. Returns `None` (not an error) if the row was
    /// not in `from_status` or owned by a different driver; returns the
    /// updated row (so the caller has its `ride_id` without a second query)
    /// if the transition applied. Caller commits or rolls back.
    pub async fn transition_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        assignment_id: i64,
        driver_id: Option<i64>,
        from_status: &str,
        to_status: &str,
    ) -> Result<Option<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_assignment");

        let row = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT id, ride_id, driver_id, status, offered_at
            FROM assignments
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(assignment_id)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(row) = row else {
            timer.record();
            return Ok(None);
        };

        let guard_ok = row.status == from_status
            && driver_id.map(|d| d == row.driver_id).unwrap_or(true);
        if !guard_ok {
            timer.record();
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            UPDATE assignments SET status = $2 WHERE id = $1
            RETURNING id, ride_id, driver_id, status, offered_at
            "#,
        )
        .bind(assignment_id)
        .bind(to_status)
        .fetch_one(&mut **tx)
        .await?;

        timer.record();
        Ok(Some(updated))
    }
}
