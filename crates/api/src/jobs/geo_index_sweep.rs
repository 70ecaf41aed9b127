//! Periodic eviction of stale driver positions from the `GeoIndex`.

use std::sync::Arc;

use tracing::info;

use domain::services::GeoIndex;

use super::scheduler::{Job, JobFrequency};

/// Sweeps the in-memory geo index on a fixed cadence, removing positions
/// older than the index's own configured `max_position_age`.
pub struct GeoIndexSweepJob {
    geo_index: Arc<dyn GeoIndex>,
    frequency: JobFrequency,
}

impl GeoIndexSweepJob {
    pub fn new(geo_index: Arc<dyn GeoIndex>, frequency: JobFrequency) -> Self {
        Self { geo_index, frequency }
    }
}

#[async_trait::async_trait]
impl Job for GeoIndexSweepJob {
    fn name(&self) -> &'static str {
        "geo_index_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        self.frequency
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self.geo_index.sweep().await;
        if removed > 0 {
            info!(removed, "swept stale driver positions");
        }
        Ok(())
    }
}
