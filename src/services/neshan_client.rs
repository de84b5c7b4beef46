// src/services/neshan_client.rs
// DOCUMENTATION: Neshan maps API client
// PURPOSE: Handle communication with the Neshan search and directions APIs

use crate::errors::PoiError;
use crate::models::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// One candidate returned by the search-by-category API
#[derive(Debug, Clone)]
pub struct SearchItem {
    pub title: String,
    pub address: Option<String>,
    pub location: Coordinate,
}

/// First leg of the best route between two coordinates
/// DOCUMENTATION: Distance and duration are the provider's localized display
/// strings; the unit normalizer turns them into integers.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub distance_text: String,
    pub duration_text: String,
}

/// Seam between the POI resolver and the map provider
/// DOCUMENTATION: Implemented by `NeshanClient` in production and by stubs in
/// tests, so resolution logic is exercised without network access.
#[async_trait]
pub trait MapsApi: Send + Sync {
    /// Search POIs by keyword around a coordinate. An empty result list is
    /// not an error here; the resolver decides what it means.
    async fn search(&self, term: &str, around: Coordinate) -> Result<Vec<SearchItem>, PoiError>;

    /// Route from origin to destination, returning the first leg.
    /// Fails with `RouteNotFound` when the provider returns no routes or legs.
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteLeg, PoiError>;
}

/// Neshan API client
/// DOCUMENTATION: Authenticates every call with the `Api-Key` header
pub struct NeshanClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<NeshanItem>,
}

#[derive(Debug, Deserialize)]
struct NeshanItem {
    title: String,
    address: Option<String>,
    location: NeshanLocation,
}

/// Neshan encodes longitude as `x` and latitude as `y`
#[derive(Debug, Deserialize)]
struct NeshanLocation {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: LegMetric,
    duration: LegMetric,
}

#[derive(Debug, Deserialize)]
struct LegMetric {
    text: String,
}

impl NeshanClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.neshan.org".to_string(),
        }
    }
}

#[async_trait]
impl MapsApi for NeshanClient {
    async fn search(&self, term: &str, around: Coordinate) -> Result<Vec<SearchItem>, PoiError> {
        let url = format!("{}/v1/search", self.base_url);

        log::debug!(
            "Neshan search: term={}, lat={}, lng={}",
            term,
            around.lat,
            around.lng
        );

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .query(&[
                ("term", term.to_string()),
                ("lat", around.lat.to_string()),
                ("lng", around.lng.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Neshan search request failed: {}", e);
                PoiError::Upstream(format!("search request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Neshan search returned status {}", status);
            return Err(PoiError::Upstream(format!("search API error: {}", status)));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Neshan search response: {}", e);
            PoiError::Upstream(format!("search parse error: {}", e))
        })?;

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchItem {
                title: item.title,
                address: item.address,
                location: Coordinate::new(item.location.y, item.location.x),
            })
            .collect())
    }

    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteLeg, PoiError> {
        let url = format!("{}/v4/direction/", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .query(&[
                ("origin", format!("{},{}", origin.lat, origin.lng)),
                (
                    "destination",
                    format!("{},{}", destination.lat, destination.lng),
                ),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Neshan directions request failed: {}", e);
                PoiError::Upstream(format!("directions request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Neshan directions returned status {}", status);
            return Err(PoiError::Upstream(format!(
                "directions API error: {}",
                status
            )));
        }

        let body: DirectionsResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Neshan directions response: {}", e);
            PoiError::Upstream(format!("directions parse error: {}", e))
        })?;

        let leg = body
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .ok_or(PoiError::RouteNotFound)?;

        Ok(RouteLeg {
            distance_text: leg.distance.text,
            duration_text: leg.duration.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let raw = r#"{
            "items": [
                {
                    "title": "مترو تجریش",
                    "address": "تجریش",
                    "category": "مترو",
                    "location": { "x": 51.4325, "y": 35.8044 }
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.items.len(), 1);
        // x/y swap into lng/lat
        assert_eq!(parsed.items[0].location.y, 35.8044);
    }

    #[test]
    fn test_directions_response_without_routes() {
        let parsed: DirectionsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.routes.is_empty());
    }

    #[test]
    fn test_directions_leg_parsing() {
        let raw = r#"{
            "routes": [
                {
                    "legs": [
                        {
                            "distance": { "value": 2000.0, "text": "۲ کیلومتر" },
                            "duration": { "value": 720.0, "text": "۱۲ دقیقه" }
                        }
                    ]
                }
            ]
        }"#;

        let parsed: DirectionsResponse = serde_json::from_str(raw).unwrap();
        let leg = &parsed.routes[0].legs[0];
        assert_eq!(leg.distance.text, "۲ کیلومتر");
        assert_eq!(leg.duration.text, "۱۲ دقیقه");
    }
}
