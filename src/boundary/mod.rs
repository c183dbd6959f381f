// src/boundary/mod.rs
//! District boundary: cached in a key-value store for 24h, refreshed from the
//! boundary source, and backed by an embedded polygon when the source fails.

pub mod geojson;

use chrono::{DateTime, Utc};
use geo::{Intersects, LineString, Polygon};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

use crate::store::KeyValueStore;
use crate::transport::Fetcher;

pub const BOUNDARY_KEY: &str = "districtGeoJSON";
pub const BOUNDARY_TIMESTAMP_KEY: &str = "districtGeoJSON_timestamp";
pub const BOUNDARY_EXPIRY_HOURS: i64 = 24;

/// Far North District fallback ring (lon, lat).
const EMBEDDED_RING: [(f64, f64); 4] = [
    (173.160619, -35.311454),
    (173.160236, -35.310268),
    (173.160056, -35.311313),
    (173.160619, -35.311454),
];

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGeometry {
    pub name: String,
    pub polygons: Vec<Polygon<f64>>,
}

impl BoundaryGeometry {
    /// True if `poly` touches or overlaps any boundary polygon.
    pub fn intersects(&self, poly: &Polygon<f64>) -> bool {
        self.polygons.iter().any(|b| b.intersects(poly))
    }
}

/// Why a refresh fell back to the embedded boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryUnavailable {
    #[error("boundary fetch failed: {0}")]
    Fetch(String),
    #[error("boundary document unparsable: {0}")]
    Parse(String),
    #[error("boundary geometry invalid: {0}")]
    Invalid(String),
    #[error("boundary document has no polygons")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryOrigin {
    Cached,
    Fetched,
    Fallback(BoundaryUnavailable),
}

#[derive(Debug, Clone)]
pub struct ResolvedBoundary {
    pub geometry: BoundaryGeometry,
    pub origin: BoundaryOrigin,
}

/// Embedded boundary used when the live source cannot be loaded.
pub fn embedded_boundary(region_name: &str) -> BoundaryGeometry {
    let ring: LineString<f64> = EMBEDDED_RING.to_vec().into();
    BoundaryGeometry {
        name: region_name.to_string(),
        polygons: vec![Polygon::new(ring, vec![])],
    }
}

/// Stale iff older than 24h. Future timestamps count as fresh.
pub fn is_expired_at(saved_ms: i64, now: DateTime<Utc>) -> bool {
    let age_ms = now.timestamp_millis() - saved_ms;
    age_ms > BOUNDARY_EXPIRY_HOURS * 3_600_000
}

/// Missing or unparsable timestamps are expired.
pub fn is_expired(saved: Option<&str>, now: DateTime<Utc>) -> bool {
    match saved.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(ms) => is_expired_at(ms, now),
        None => true,
    }
}

pub struct BoundaryCache {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn Fetcher>,
}

impl BoundaryCache {
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Always yields a boundary; see [`BoundaryCache::resolve`] for the path taken.
    pub async fn get_boundary(
        &self,
        target_region_name: &str,
        boundary_source: &str,
        now: DateTime<Utc>,
    ) -> BoundaryGeometry {
        self.resolve(target_region_name, boundary_source, now)
            .await
            .geometry
    }

    pub async fn resolve(
        &self,
        target_region_name: &str,
        boundary_source: &str,
        now: DateTime<Utc>,
    ) -> ResolvedBoundary {
        if let Some(geometry) = self.read_fresh(target_region_name, now) {
            return ResolvedBoundary {
                geometry,
                origin: BoundaryOrigin::Cached,
            };
        }

        counter!("boundary_refresh_total").increment(1);
        match self.fetch(target_region_name, boundary_source).await {
            Ok(geometry) => {
                tracing::info!(
                    target: "boundary",
                    region = %geometry.name,
                    polygons = geometry.polygons.len(),
                    "boundary refreshed"
                );
                self.persist(&geometry, now);
                ResolvedBoundary {
                    geometry,
                    origin: BoundaryOrigin::Fetched,
                }
            }
            Err(reason) => {
                tracing::warn!(
                    target: "boundary",
                    error = %reason,
                    "failed to fetch live boundary, using embedded fallback"
                );
                counter!("boundary_fallback_total").increment(1);
                let geometry = embedded_boundary(target_region_name);
                self.persist(&geometry, now);
                ResolvedBoundary {
                    geometry,
                    origin: BoundaryOrigin::Fallback(reason),
                }
            }
        }
    }

    fn read_fresh(&self, target: &str, now: DateTime<Utc>) -> Option<BoundaryGeometry> {
        let ts = self.store.get(BOUNDARY_TIMESTAMP_KEY);
        if is_expired(ts.as_deref(), now) {
            return None;
        }
        let raw = self.store.get(BOUNDARY_KEY)?;
        match geojson::parse_cached(&raw, target) {
            Ok(Some(b)) => Some(b),
            Ok(None) => {
                tracing::debug!(target: "boundary", wanted = target, "cached boundary is for another region");
                None
            }
            Err(e) => {
                tracing::warn!(target: "boundary", error = %e, "corrupted boundary in cache");
                None
            }
        }
    }

    async fn fetch(&self, target: &str, source: &str) -> Result<BoundaryGeometry, BoundaryUnavailable> {
        let text = self
            .fetcher
            .fetch_text(source)
            .await
            .map_err(|e| BoundaryUnavailable::Fetch(format!("{e:#}")))?;
        geojson::parse_boundary(&text, target)
    }

    fn persist(&self, geometry: &BoundaryGeometry, now: DateTime<Utc>) {
        let body = geojson::to_geojson(geometry);
        if let Err(e) = self.store.set(BOUNDARY_KEY, &body) {
            tracing::warn!(target: "boundary", error = %format!("{e:#}"), "store boundary");
            return;
        }
        if let Err(e) = self
            .store
            .set(BOUNDARY_TIMESTAMP_KEY, &now.timestamp_millis().to_string())
        {
            tracing::warn!(target: "boundary", error = %format!("{e:#}"), "store boundary timestamp");
        }
    }
}
