//! Idempotency key entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the `idempotency_keys` table.
///
/// `response` is `NULL` between the winning caller's insert and it finishing
/// the work the key guards; `RideOrchestrator::create_ride` is the only
/// caller, and it always fills it in before returning. Concurrent callers
/// that lose the `ON CONFLICT DO NOTHING` race never get a row of their own
/// to hold — they poll `IdempotencyKeyRepository::find_response` against the
/// winner's row instead.
#[derive(Debug, Clone, FromRow)]
pub struct IdempotencyKeyEntity {
    pub id: i64,
    pub key: String,
    pub response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_without_response_is_a_fresh_claim() {
        let entity = IdempotencyKeyEntity {
            id: 1,
            key: "abc".to_string(),
            response: None,
            created_at: Utc::now(),
        };
        assert!(entity.response.is_none());
    }
}
