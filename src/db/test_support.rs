// src/db/test_support.rs
// DOCUMENTATION: In-memory PoiStore stub for tests
// PURPOSE: Exercise cache read/write logic without PostgreSQL, with call
// counting for verifying how often each storage operation runs

use crate::errors::PoiError;
use crate::models::{CachedPoiRow, Coordinate, PoiCategory};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::PoiStore;

#[derive(Debug, Clone)]
pub struct StoredPoi {
    pub id: i64,
    pub category: PoiCategory,
    pub name: String,
    pub address: Option<String>,
    pub location: Coordinate,
}

#[derive(Debug, Clone)]
pub struct StoredMetric {
    pub origin_id: String,
    pub origin: Coordinate,
    pub poi_id: i64,
    pub distance_meters: i32,
    pub duration_minutes: i32,
}

/// Honors the same conflict semantics as the Postgres store: POI identity is
/// (coordinate, name, category), metrics are unique per (origin_id, poi_id).
#[derive(Default)]
pub struct RecordingStore {
    pois: Mutex<Vec<StoredPoi>>,
    metrics: Mutex<Vec<StoredMetric>>,
    poi_calls: AtomicUsize,
    metric_calls: AtomicUsize,
    find_calls: AtomicUsize,
    errors: AtomicUsize,
    fail_reads: AtomicBool,
}

impl RecordingStore {
    /// Make every cache lookup fail with a store error
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn poi_upserts(&self) -> usize {
        self.poi_calls.load(Ordering::SeqCst)
    }

    pub fn metric_upserts(&self) -> usize {
        self.metric_calls.load(Ordering::SeqCst)
    }

    pub fn cache_lookups(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    /// Total rows actually stored (POIs + metrics)
    pub fn stored_row_count(&self) -> usize {
        self.pois.lock().unwrap().len() + self.metrics.lock().unwrap().len()
    }
}

#[async_trait]
impl PoiStore for RecordingStore {
    async fn upsert_poi(
        &self,
        category: PoiCategory,
        name: &str,
        address: Option<&str>,
        location: Coordinate,
    ) -> Result<i64, PoiError> {
        self.poi_calls.fetch_add(1, Ordering::SeqCst);
        let mut pois = self.pois.lock().unwrap();

        if let Some(existing) = pois
            .iter()
            .find(|p| p.category == category && p.name == name && p.location == location)
        {
            return Ok(existing.id);
        }

        let id = pois.len() as i64 + 1;
        pois.push(StoredPoi {
            id,
            category,
            name: name.to_string(),
            address: address.map(str::to_string),
            location,
        });
        Ok(id)
    }

    async fn upsert_travel_metric(
        &self,
        origin_id: &str,
        origin: Coordinate,
        poi_id: i64,
        distance_meters: i32,
        duration_minutes: i32,
    ) -> Result<u64, PoiError> {
        self.metric_calls.fetch_add(1, Ordering::SeqCst);
        let mut metrics = self.metrics.lock().unwrap();

        if metrics
            .iter()
            .any(|m| m.origin_id == origin_id && m.poi_id == poi_id)
        {
            return Ok(0);
        }

        metrics.push(StoredMetric {
            origin_id: origin_id.to_string(),
            origin,
            poi_id,
            distance_meters,
            duration_minutes,
        });
        Ok(1)
    }

    async fn find_cached_pois(&self, origin: Coordinate) -> Result<Vec<CachedPoiRow>, PoiError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_reads.load(Ordering::SeqCst) {
            self.errors.fetch_add(1, Ordering::SeqCst);
            return Err(PoiError::Store("injected read failure".to_string()));
        }

        let pois = self.pois.lock().unwrap();
        let metrics = self.metrics.lock().unwrap();

        let mut rows: Vec<CachedPoiRow> = metrics
            .iter()
            .filter(|m| m.origin == origin)
            .filter_map(|m| {
                pois.iter().find(|p| p.id == m.poi_id).map(|p| CachedPoiRow {
                    category: p.category.as_str().to_string(),
                    name: p.name.clone(),
                    address: p.address.clone(),
                    latitude: p.location.lat,
                    longitude: p.location.lng,
                    distance_meters: m.distance_meters,
                    duration_minutes: m.duration_minutes,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.distance_meters.cmp(&b.distance_meters))
        });
        Ok(rows)
    }
}
