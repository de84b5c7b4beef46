// src/models/poi.rs
// DOCUMENTATION: Core data structures for POI resolution
// PURPOSE: Defines the coordinate, category and result types shared by the
// live aggregation path, the cache and the HTTP surface

use crate::errors::PoiError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// Geographic coordinate (WGS84)
/// DOCUMENTATION: `(0, 0)` is the upstream sentinel for "listing has no
/// location" and must never reach the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject the "no location" sentinel before any upstream or storage call
    pub fn validate(&self) -> Result<(), PoiError> {
        if self.lat == 0.0 && self.lng == 0.0 {
            return Err(PoiError::InvalidCoordinate(
                "(0, 0) means the listing has no location".to_string(),
            ));
        }
        Ok(())
    }
}

/// The fixed set of POI categories resolved for every listing
/// DOCUMENTATION: Closed enum so adding a category is a type-checked change,
/// not a new magic string. Wire/storage names are the snake_case forms below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Subway,
    BusStation,
    Hospital,
    SuperMarket,
    FruitMarket,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 5] = [
        PoiCategory::Subway,
        PoiCategory::BusStation,
        PoiCategory::Hospital,
        PoiCategory::SuperMarket,
        PoiCategory::FruitMarket,
    ];

    /// Stable name used in storage rows and JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            PoiCategory::Subway => "subway",
            PoiCategory::BusStation => "bus_station",
            PoiCategory::Hospital => "hospital",
            PoiCategory::SuperMarket => "super_market",
            PoiCategory::FruitMarket => "fruit_market",
        }
    }

    /// Parse a storage row's category name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Search keyword sent to the map provider (its index is Persian-only)
    pub fn search_term(&self) -> &'static str {
        match self {
            PoiCategory::Subway => "مترو",
            PoiCategory::BusStation => "ایستگاه اتوبوس",
            PoiCategory::Hospital => "بیمارستان",
            PoiCategory::SuperMarket => "سوپرمارکت",
            PoiCategory::FruitMarket => "بازار میوه",
        }
    }
}

/// A POI enriched with route distance/duration from the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPoi {
    pub name: String,
    pub address: Option<String>,
    pub location: Coordinate,
    pub distance_meters: i32,
    pub duration_minutes: i32,
}

/// Per-category nearby POIs, closest-first
/// DOCUMENTATION: Shared shape of the live aggregation result and the cached
/// result; a category that failed to resolve is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPois {
    #[serde(flatten)]
    pub categories: HashMap<PoiCategory, Vec<EnrichedPoi>>,
}

impl NearbyPois {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total POI count across all categories
    pub fn poi_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// One cached POI/metric row as returned by the store
#[derive(Debug, Clone, FromRow)]
pub struct CachedPoiRow {
    pub category: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: i32,
    pub duration_minutes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_coordinate_rejected() {
        assert!(Coordinate::new(0.0, 0.0).validate().is_err());
        assert!(Coordinate::new(35.6892, 51.3890).validate().is_ok());
        // Either axis alone being zero is a real coordinate
        assert!(Coordinate::new(0.0, 51.3890).validate().is_ok());
    }

    #[test]
    fn test_category_name_round_trip() {
        for category in PoiCategory::ALL {
            assert_eq!(PoiCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(PoiCategory::parse("pharmacy"), None);
    }

    #[test]
    fn test_nearby_pois_serializes_category_keys() {
        let mut result = NearbyPois::default();
        result.categories.insert(
            PoiCategory::BusStation,
            vec![EnrichedPoi {
                name: "Central Terminal".to_string(),
                address: None,
                location: Coordinate::new(35.7, 51.4),
                distance_meters: 420,
                duration_minutes: 3,
            }],
        );

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("bus_station").is_some());
        assert_eq!(value["bus_station"][0]["distance_meters"], 420);
    }
}
