// src/services/poi_service.rs
// DOCUMENTATION: POI resolution engine
// PURPOSE: Per-category resolution, parallel fan-out over the fixed category
// set, cache-aside read path and the caller-facing orchestration

use crate::db::PoiStore;
use crate::errors::PoiError;
use crate::models::{Coordinate, EnrichedPoi, NearbyPois, PoiCategory};
use crate::services::cache_writer::{CacheWriteJob, CacheWriter};
use crate::services::neshan_client::{MapsApi, SearchItem};
use crate::services::units;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// POI resolution service
/// DOCUMENTATION: Read path is cache-aside (exact-coordinate lookup, live
/// aggregation on miss); the write-back goes through the bounded `CacheWriter`
/// after the result is already on its way to the caller.
pub struct PoiService {
    maps: Arc<dyn MapsApi>,
    store: Arc<dyn PoiStore>,
    writer: CacheWriter,
    limit: usize,
}

impl PoiService {
    /// `limit` is the number of nearest candidates kept per category
    pub fn new(
        maps: Arc<dyn MapsApi>,
        store: Arc<dyn PoiStore>,
        writer: CacheWriter,
        limit: usize,
    ) -> Self {
        Self {
            maps,
            store,
            writer,
            limit,
        }
    }

    /// Resolve nearby POIs for a listing, serving from cache when possible
    /// DOCUMENTATION: A hard store-read failure surfaces to the caller; it
    /// cannot be conflated with a cold cache. A miss runs the live aggregation
    /// and queues a detached write-back keyed by `origin_id`.
    pub async fn resolve_nearby_pois(
        &self,
        origin_id: &str,
        origin: Coordinate,
    ) -> Result<NearbyPois, PoiError> {
        origin.validate()?;

        if let Some(cached) = self.find_cached(origin).await? {
            log::info!(
                "Cache hit for ({}, {}): {} POIs",
                origin.lat,
                origin.lng,
                cached.poi_count()
            );
            return Ok(cached);
        }

        let live = self.resolve_all(origin).await;

        self.writer.submit(CacheWriteJob {
            origin_id: origin_id.to_string(),
            origin,
            result: live.clone(),
        });

        Ok(live)
    }

    /// Fan the category resolver out across the fixed category set
    /// DOCUMENTATION: One worker per category, joined before returning. A
    /// failing category is logged and omitted; partial data is still useful.
    /// The result map insert is the only critical section, and no lock is held
    /// across an upstream call.
    pub async fn resolve_all(&self, origin: Coordinate) -> NearbyPois {
        let results: Arc<Mutex<HashMap<PoiCategory, Vec<EnrichedPoi>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let mut workers = Vec::with_capacity(PoiCategory::ALL.len());
        for category in PoiCategory::ALL {
            let maps = Arc::clone(&self.maps);
            let results = Arc::clone(&results);
            let limit = self.limit;

            workers.push(tokio::spawn(async move {
                match resolve_category_inner(maps, origin, category, limit).await {
                    Ok(pois) => {
                        results
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .insert(category, pois);
                    }
                    Err(e) => log::warn!("Error finding {}: {}", category.as_str(), e),
                }
            }));
        }

        for worker in workers {
            if let Err(e) = worker.await {
                log::error!("POI category worker panicked: {}", e);
            }
        }

        let categories = match Arc::try_unwrap(results) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|e| e.into_inner()),
            Err(shared) => shared.lock().unwrap_or_else(|e| e.into_inner()).clone(),
        };

        NearbyPois { categories }
    }

    /// Resolve one category: search, rank, truncate, route, normalize
    pub async fn resolve_category(
        &self,
        origin: Coordinate,
        category: PoiCategory,
    ) -> Result<Vec<EnrichedPoi>, PoiError> {
        resolve_category_inner(Arc::clone(&self.maps), origin, category, self.limit).await
    }

    /// Cache read path: exact-coordinate lookup grouped into the live shape
    /// DOCUMENTATION: `Ok(None)` is the cache miss; only real storage failures
    /// become errors.
    pub async fn find_cached(&self, origin: Coordinate) -> Result<Option<NearbyPois>, PoiError> {
        let rows = self.store.find_cached_pois(origin).await?;

        if rows.is_empty() {
            log::debug!("Cache miss for ({}, {})", origin.lat, origin.lng);
            return Ok(None);
        }

        let mut categories: HashMap<PoiCategory, Vec<EnrichedPoi>> = HashMap::new();
        for row in rows {
            let Some(category) = PoiCategory::parse(&row.category) else {
                log::warn!("Unknown POI type {:?} in store, skipping row", row.category);
                continue;
            };
            // Rows arrive ordered by route distance, so pushing keeps
            // closest-first ordering within each category
            categories.entry(category).or_default().push(EnrichedPoi {
                name: row.name,
                address: row.address,
                location: Coordinate::new(row.latitude, row.longitude),
                distance_meters: row.distance_meters,
                duration_minutes: row.duration_minutes,
            });
        }

        Ok(Some(NearbyPois { categories }))
    }
}

async fn resolve_category_inner(
    maps: Arc<dyn MapsApi>,
    origin: Coordinate,
    category: PoiCategory,
    limit: usize,
) -> Result<Vec<EnrichedPoi>, PoiError> {
    let items = maps.search(category.search_term(), origin).await?;

    if items.is_empty() {
        return Err(PoiError::NotFound(format!(
            "no {} near ({}, {})",
            category.as_str(),
            origin.lat,
            origin.lng
        )));
    }

    let mut ranked: Vec<(f64, SearchItem)> = items
        .into_iter()
        .map(|item| (haversine_km(origin, item.location), item))
        .collect();
    ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);

    // Every retained candidate is routed; there is deliberately no
    // straight-line radius cut before the directions calls. A failed route or
    // unparsable leg fails the whole category, never a partial list.
    let mut enriched = Vec::with_capacity(ranked.len());
    for (_, item) in ranked {
        let leg = maps.directions(origin, item.location).await?;
        enriched.push(EnrichedPoi {
            name: item.title,
            address: item.address,
            location: item.location,
            distance_meters: units::normalize_distance(&leg.distance_text)?,
            duration_minutes: units::normalize_duration(&leg.duration_text)?,
        });
    }

    Ok(enriched)
}

/// Great-circle distance between two coordinates in kilometers
/// Uses Haversine formula
fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}
