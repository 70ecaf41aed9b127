//! Idempotency key cleanup background job.

use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Deletes idempotency keys older than a retention window, in batches to
/// avoid holding a long lock over the table.
pub struct IdempotencyCleanupJob {
    pool: PgPool,
    retention_days: u32,
    batch_size: i64,
}

impl IdempotencyCleanupJob {
    pub fn new(pool: PgPool, retention_days: u32) -> Self {
        Self {
            pool,
            retention_days,
            batch_size: 10_000,
        }
    }

    async fn delete_expired_keys(&self) -> Result<u64, sqlx::Error> {
        let mut total_deleted: u64 = 0;

        loop {
            let result = sqlx::query(
                r#"
                WITH to_delete AS (
                    SELECT id FROM idempotency_keys
                    WHERE created_at < NOW() - ($1 || ' days')::INTERVAL
                    LIMIT $2
                )
                DELETE FROM idempotency_keys
                WHERE id IN (SELECT id FROM to_delete)
                "#,
            )
            .bind(self.retention_days as i32)
            .bind(self.batch_size)
            .execute(&self.pool)
            .await?;

            let deleted = result.rows_affected();
            total_deleted += deleted;

            if deleted < self.batch_size as u64 {
                break;
            }

            tokio::task::yield_now().await;
        }

        Ok(total_deleted)
    }
}

#[async_trait::async_trait]
impl Job for IdempotencyCleanupJob {
    fn name(&self) -> &'static str {
        "idempotency_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let deleted = self
            .delete_expired_keys()
            .await
            .map_err(|e| format!("Failed to delete expired idempotency keys: {}", e))?;

        info!(deleted, retention_days = self.retention_days, "cleaned up idempotency keys");

        Ok(())
    }
}
