//! Driver entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the `drivers` table.
#[derive(Debug, Clone, FromRow)]
pub struct DriverEntity {
    pub id: i64,
    pub available: bool,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DriverEntity> for domain::models::Driver {
    fn from(e: DriverEntity) -> Self {
        Self {
            id: e.id,
            available: e.available,
            name: e.name,
            created_at: e.created_at,
        }
    }
}
