//! Nearest-eligible-driver search over the [`GeoIndex`](super::geo_index::GeoIndex).

use std::sync::Arc;

use crate::models::{haversine_km, Coordinate};

use super::geo_index::{DriverId, GeoIndex};

/// Candidate limit passed to the underlying radius query. Generous enough
/// that re-verification rarely needs a second pass even with a handful of
/// stale positions mixed in.
const CANDIDATE_LIMIT: usize = 50;

pub struct Matcher {
    geo_index: Arc<dyn GeoIndex>,
}

impl Matcher {
    pub fn new(geo_index: Arc<dyn GeoIndex>) -> Self {
        Self { geo_index }
    }

    /// Finds the nearest driver to `pickup` within `max_km`, re-verifying
    /// each candidate's authoritative position before accepting it.
    pub async fn find_nearest(&self, pickup: Coordinate, max_km: f64) -> Option<DriverId> {
        let candidates = self.geo_index.radius(pickup, max_km, CANDIDATE_LIMIT).await;

        for (driver_id, _approx_km) in candidates {
            let Some(position) = self.geo_index.get(driver_id).await else {
                continue;
            };
            let dist = haversine_km(pickup, position);
            if dist <= max_km {
                return Some(driver_id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geo_index::InMemoryGeoIndex;
    use chrono::Duration;

    fn matcher() -> (Matcher, Arc<InMemoryGeoIndex>) {
        let index = Arc::new(InMemoryGeoIndex::new(2.0, Duration::seconds(300)));
        (Matcher::new(index.clone()), index)
    }

    #[tokio::test]
    async fn returns_none_on_empty_index() {
        let (matcher, _index) = matcher();
        let pickup = Coordinate::new(12.9716, 77.5946);
        assert!(matcher.find_nearest(pickup, 5.0).await.is_none());
    }

    #[tokio::test]
    async fn returns_nearest_within_radius() {
        let (matcher, index) = matcher();
        let pickup = Coordinate::new(12.9716, 77.5946);
        index.upsert(1, Coordinate::new(13.5, 78.0)).await.unwrap(); // far
        index.upsert(2, Coordinate::new(12.975, 77.599)).await.unwrap(); // near

        let nearest = matcher.find_nearest(pickup, 5.0).await;
        assert_eq!(nearest, Some(2));
    }

    #[tokio::test]
    async fn ignores_candidates_outside_radius() {
        let (matcher, index) = matcher();
        let pickup = Coordinate::new(0.0, 0.0);
        index.upsert(1, Coordinate::new(5.0, 5.0)).await.unwrap();
        assert!(matcher.find_nearest(pickup, 1.0).await.is_none());
    }
}
