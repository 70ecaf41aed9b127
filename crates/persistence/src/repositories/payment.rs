//! Payment repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::PaymentEntity;
use crate::metrics::QueryTimer;

/// Repository for payment database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a `Pending` payment against a caller-owned transaction, so it
    /// can be composed with the trip-completion update that must commit
    /// alongside it (§4.5 step 5).
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        trip_id: i64,
        amount: f64,
    ) -> Result<PaymentEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_payment");
        let entity = sqlx::query_as::<_, PaymentEntity>(
            r#"
            INSERT INTO payments (trip_id, amount, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, trip_id, amount, status, provider_response, created_at
            "#,
        )
        .bind(trip_id)
        .bind(amount)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        entity
    }

    pub async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payment_by_id");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT id, trip_id, amount, status, provider_response, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the most recently created payment for a trip, if any.
    pub async fn find_latest_by_trip(&self, trip_id: i64) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_payment_by_trip");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT id, trip_id, amount, status, provider_response, created_at
            FROM payments
            WHERE trip_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Transitions a payment out of `Pending`, guarded by
    /// `WHERE status = 'pending'` so settlement is safe to retry.
    /// Returns `false` if the payment was already terminal.
    pub async fn settle(
        &self,
        payment_id: i64,
        status: &str,
        provider_response: serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("settle_payment");
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, provider_response = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(payment_id)
        .bind(status)
        .bind(provider_response)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
