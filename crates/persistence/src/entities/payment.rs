//! Payment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::error::DomainError;
use domain::models::{Payment, PaymentStatus};

/// Database row mapping for the `payments` table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: i64,
    pub trip_id: i64,
    pub amount: f64,
    pub status: String,
    pub provider_response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentEntity> for Payment {
    type Error = DomainError;

    fn try_from(e: PaymentEntity) -> Result<Self, Self::Error> {
        let status: PaymentStatus = e
            .status
            .parse()
            .map_err(|err: String| DomainError::IllegalState(err))?;
        Ok(Payment {
            id: e.id,
            trip_id: e.trip_id,
            amount: e.amount,
            status,
            provider_response: e.provider_response,
            created_at: e.created_at,
        })
    }
}
