//! In-memory index of live driver positions.
//!
//! Backed by `dashmap` rather than an external store: a single service
//! process owns the whole index, so there is no need for the network hop
//! (and associated failure mode) the original implementation paid for by
//! keeping driver positions in Redis behind a dedicated discovery service.

use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, DashSet};

use crate::error::DomainError;
use crate::models::{haversine_km, Coordinate, DriverPosition};

pub type DriverId = i64;

/// Registry of live driver positions supporting nearest-K radius queries.
#[async_trait::async_trait]
pub trait GeoIndex: Send + Sync {
    /// Record (or refresh) a driver's position.
    async fn upsert(&self, driver_id: DriverId, position: Coordinate) -> Result<(), DomainError>;

    /// Returns the driver's position if it is still fresh; evicts it as a
    /// side effect otherwise.
    async fn get(&self, driver_id: DriverId) -> Option<Coordinate>;

    /// Returns up to `limit` drivers within `radius_km` of `center`, ordered
    /// by increasing distance then by ascending driver id.
    async fn radius(
        &self,
        center: Coordinate,
        radius_km: f64,
        limit: usize,
    ) -> Vec<(DriverId, f64)>;

    /// Unconditionally removes a driver's position.
    async fn evict(&self, driver_id: DriverId);

    /// Removes every position older than the configured max age. Returns the
    /// number of entries removed.
    async fn sweep(&self) -> usize;
}

/// Grid-bucketed, `dashmap`-backed implementation of [`GeoIndex`].
///
/// Internal bucketing is a fixed-size lat/lon grid, not the H3 cell index the
/// original service used — any scheme with no false negatives within
/// `radius_km + epsilon` satisfies the contract, and a grid needs no extra
/// crate beyond `dashmap` already pulled in for the concurrent map itself.
pub struct InMemoryGeoIndex {
    positions: DashMap<DriverId, DriverPosition>,
    buckets: DashMap<(i64, i64), DashSet<DriverId>>,
    bucket_size_km: f64,
    max_position_age: Duration,
}

const KM_PER_DEGREE_LAT: f64 = 111.0;

impl InMemoryGeoIndex {
    pub fn new(bucket_size_km: f64, max_position_age: Duration) -> Self {
        Self {
            positions: DashMap::new(),
            buckets: DashMap::new(),
            bucket_size_km,
            max_position_age,
        }
    }

    fn bucket_key(&self, c: Coordinate) -> (i64, i64) {
        let lat_cell = (c.lat * KM_PER_DEGREE_LAT / self.bucket_size_km).floor() as i64;
        let km_per_degree_lon = (KM_PER_DEGREE_LAT * c.lat.to_radians().cos()).max(1.0);
        let lon_cell = (c.lon * km_per_degree_lon / self.bucket_size_km).floor() as i64;
        (lat_cell, lon_cell)
    }

    fn remove_from_bucket(&self, key: (i64, i64), driver_id: DriverId) {
        if let Some(set) = self.buckets.get(&key) {
            set.remove(&driver_id);
        }
    }

    fn is_stale(&self, pos: &DriverPosition, now: DateTime<Utc>) -> bool {
        !pos.is_fresh(now, self.max_position_age)
    }
}

#[async_trait::async_trait]
impl GeoIndex for InMemoryGeoIndex {
    async fn upsert(&self, driver_id: DriverId, position: Coordinate) -> Result<(), DomainError> {
        let now = Utc::now();
        let new_key = self.bucket_key(position);

        if let Some(old) = self.positions.get(&driver_id) {
            let old_key = self.bucket_key(old.position);
            if old_key != new_key {
                self.remove_from_bucket(old_key, driver_id);
            }
        }

        self.buckets
            .entry(new_key)
            .or_insert_with(DashSet::new)
            .insert(driver_id);

        self.positions.insert(
            driver_id,
            DriverPosition {
                driver_id,
                position,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn get(&self, driver_id: DriverId) -> Option<Coordinate> {
        let now = Utc::now();
        let fresh = self
            .positions
            .get(&driver_id)
            .filter(|p| !self.is_stale(p, now))
            .map(|p| p.position);

        if fresh.is_none() {
            self.evict(driver_id).await;
        }
        fresh
    }

    async fn radius(
        &self,
        center: Coordinate,
        radius_km: f64,
        limit: usize,
    ) -> Vec<(DriverId, f64)> {
        let now = Utc::now();
        let cell_span = (radius_km / self.bucket_size_km).ceil() as i64 + 1;
        let (center_lat_cell, center_lon_cell) = self.bucket_key(center);

        let mut candidates: Vec<(DriverId, f64)> = Vec::new();
        for lat_cell in (center_lat_cell - cell_span)..=(center_lat_cell + cell_span) {
            for lon_cell in (center_lon_cell - cell_span)..=(center_lon_cell + cell_span) {
                let Some(bucket) = self.buckets.get(&(lat_cell, lon_cell)) else {
                    continue;
                };
                for driver_id in bucket.iter() {
                    let driver_id = *driver_id;
                    let Some(pos) = self.positions.get(&driver_id) else {
                        continue;
                    };
                    if self.is_stale(&pos, now) {
                        continue;
                    }
                    let dist = haversine_km(center, pos.position);
                    if dist <= radius_km {
                        candidates.push((driver_id, dist));
                    }
                }
            }
        }

        candidates.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates.dedup_by_key(|(id, _)| *id);
        candidates.truncate(limit);
        candidates
    }

    async fn evict(&self, driver_id: DriverId) {
        if let Some((_, pos)) = self.positions.remove(&driver_id) {
            let key = self.bucket_key(pos.position);
            self.remove_from_bucket(key, driver_id);
        }
    }

    async fn sweep(&self) -> usize {
        let now = Utc::now();
        let stale: Vec<DriverId> = self
            .positions
            .iter()
            .filter(|entry| self.is_stale(entry.value(), now))
            .map(|entry| *entry.key())
            .collect();

        let removed = stale.len();
        for driver_id in stale {
            self.evict(driver_id).await;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InMemoryGeoIndex {
        InMemoryGeoIndex::new(2.0, Duration::seconds(300))
    }

    #[tokio::test]
    async fn upsert_then_get_returns_fresh_position() {
        let idx = index();
        let pos = Coordinate::new(12.9716, 77.5946);
        idx.upsert(1, pos).await.unwrap();
        let got = idx.get(1).await.unwrap();
        assert_eq!(got.lat, pos.lat);
        assert_eq!(got.lon, pos.lon);
    }

    #[tokio::test]
    async fn get_on_unknown_driver_is_absent() {
        let idx = index();
        assert!(idx.get(999).await.is_none());
    }

    #[tokio::test]
    async fn radius_returns_nearby_drivers_ordered_by_distance() {
        let idx = index();
        let center = Coordinate::new(12.9716, 77.5946);
        idx.upsert(1, Coordinate::new(12.9716, 77.5946)).await.unwrap(); // ~0 km
        idx.upsert(2, Coordinate::new(12.975, 77.599)).await.unwrap(); // ~0.5 km
        idx.upsert(3, Coordinate::new(13.5, 78.0)).await.unwrap(); // far away

        let results = idx.radius(center, 5.0, 10).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 2);
        assert!(results[0].1 < results[1].1);
    }

    #[tokio::test]
    async fn radius_respects_limit() {
        let idx = index();
        let center = Coordinate::new(0.0, 0.0);
        for i in 0..5 {
            idx.upsert(i, Coordinate::new(0.001 * i as f64, 0.0))
                .await
                .unwrap();
        }
        let results = idx.radius(center, 50.0, 2).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn radius_on_empty_index_is_empty() {
        let idx = index();
        let results = idx.radius(Coordinate::new(0.0, 0.0), 5.0, 10).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn evict_removes_driver_from_index_and_bucket() {
        let idx = index();
        idx.upsert(1, Coordinate::new(10.0, 10.0)).await.unwrap();
        idx.evict(1).await;
        assert!(idx.get(1).await.is_none());
        assert!(idx.radius(Coordinate::new(10.0, 10.0), 5.0, 10).await.is_empty());
    }

    #[tokio::test]
    async fn sweep_removes_stale_entries_only() {
        let idx = InMemoryGeoIndex::new(2.0, Duration::seconds(0));
        idx.upsert(1, Coordinate::new(1.0, 1.0)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let removed = idx.sweep().await;
        assert_eq!(removed, 1);
        assert!(idx.get(1).await.is_none());
    }

    #[tokio::test]
    async fn upsert_moves_driver_between_buckets() {
        let idx = index();
        idx.upsert(1, Coordinate::new(0.0, 0.0)).await.unwrap();
        idx.upsert(1, Coordinate::new(10.0, 10.0)).await.unwrap();
        let near_origin = idx.radius(Coordinate::new(0.0, 0.0), 5.0, 10).await;
        assert!(near_origin.is_empty());
        let near_new = idx.radius(Coordinate::new(10.0, 10.0), 5.0, 10).await;
        assert_eq!(near_new.len(), 1);
    }
}
