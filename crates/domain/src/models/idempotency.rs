//! Idempotency key domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client-supplied token deduplicating repeated `create_ride` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: String,
    pub cached_response: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
