// src/db/poi_store.rs
// DOCUMENTATION: POI/travel-metric storage layer
// PURPOSE: Idempotent-write contract for the cache, plus the exact-coordinate
// cached-result lookup

use crate::errors::PoiError;
use crate::models::{CachedPoiRow, Coordinate, PoiCategory};
use async_trait::async_trait;
use sqlx::PgPool;

/// Storage contract for the POI cache
/// DOCUMENTATION: Writes are insert-or-ignore; repeating an identical write is
/// a no-op by contract, not by accident of a backend's conflict clause.
/// Implemented by `PgPoiStore` in production and by counting stubs in tests.
#[async_trait]
pub trait PoiStore: Send + Sync {
    /// Insert a POI if its identity (coordinate, name, category) is new and
    /// return its storage-assigned id either way.
    async fn upsert_poi(
        &self,
        category: PoiCategory,
        name: &str,
        address: Option<&str>,
        location: Coordinate,
    ) -> Result<i64, PoiError>;

    /// Insert a travel metric for (origin_id, poi_id), ignoring conflicts.
    /// Returns the number of rows affected; zero means "already cached".
    async fn upsert_travel_metric(
        &self,
        origin_id: &str,
        origin: Coordinate,
        poi_id: i64,
        distance_meters: i32,
        duration_minutes: i32,
    ) -> Result<u64, PoiError>;

    /// All cached POI/metric rows for an origin coordinate (exact match),
    /// ordered by category then route distance ascending. An empty vector is
    /// the cache miss.
    async fn find_cached_pois(&self, origin: Coordinate) -> Result<Vec<CachedPoiRow>, PoiError>;
}

/// PostgreSQL-backed store
pub struct PgPoiStore {
    pool: PgPool,
}

impl PgPoiStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PoiStore for PgPoiStore {
    async fn upsert_poi(
        &self,
        category: PoiCategory,
        name: &str,
        address: Option<&str>,
        location: Coordinate,
    ) -> Result<i64, PoiError> {
        // Insert first with DO NOTHING so a fresh row reports its id directly
        let inserted: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO pois (type, name, address, latitude, longitude, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (latitude, longitude, name, type) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(category.as_str())
        .bind(name)
        .bind(address)
        .bind(location.lat)
        .bind(location.lng)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert {} POI '{}': {}", category.as_str(), name, e);
            PoiError::Store(e.to_string())
        })?;

        if let Some((id,)) = inserted {
            return Ok(id);
        }

        // Conflict: the POI already exists, fetch its id
        let existing: (i64,) = sqlx::query_as(
            r#"
            SELECT id FROM pois
            WHERE latitude = $1 AND longitude = $2 AND name = $3 AND type = $4
            "#,
        )
        .bind(location.lat)
        .bind(location.lng)
        .bind(name)
        .bind(category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up existing POI '{}': {}", name, e);
            PoiError::Store(e.to_string())
        })?;

        Ok(existing.0)
    }

    async fn upsert_travel_metric(
        &self,
        origin_id: &str,
        origin: Coordinate,
        poi_id: i64,
        distance_meters: i32,
        duration_minutes: i32,
    ) -> Result<u64, PoiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO travel_metrics (
                origin_id, destination_id, origin_lat, origin_lng,
                distance_meters, duration_minutes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (origin_id, destination_id) DO NOTHING
            "#,
        )
        .bind(origin_id)
        .bind(poi_id)
        .bind(origin.lat)
        .bind(origin.lng)
        .bind(distance_meters)
        .bind(duration_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to save travel metrics for origin {} -> poi {}: {}",
                origin_id,
                poi_id,
                e
            );
            PoiError::Store(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    async fn find_cached_pois(&self, origin: Coordinate) -> Result<Vec<CachedPoiRow>, PoiError> {
        let rows = sqlx::query_as::<_, CachedPoiRow>(
            r#"
            SELECT
                p.type AS category, p.name, p.address, p.latitude, p.longitude,
                m.distance_meters, m.duration_minutes
            FROM travel_metrics m
            JOIN pois p ON p.id = m.destination_id
            WHERE m.origin_lat = $1 AND m.origin_lng = $2
            ORDER BY p.type, m.distance_meters ASC
            "#,
        )
        .bind(origin.lat)
        .bind(origin.lng)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!(
                "Cache lookup failed for ({}, {}): {}",
                origin.lat,
                origin.lng,
                e
            );
            PoiError::Store(e.to_string())
        })?;

        Ok(rows)
    }
}
