// src/services/tapsi_client.rs
// DOCUMENTATION: Tapsi ride-price provider
// PURPOSE: Fetch a fare estimate from the Tapsi ride-preview API

use crate::errors::PoiError;
use crate::models::{Coordinate, RideProvider};
use crate::services::price_service::PriceProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PREVIEW_URL: &str = "https://api.tapsi.cab/api/v3/ride/preview";

pub struct TapsiClient {
    client: Client,
    access_token: String,
    cookie: String,
}

#[derive(Debug, Serialize)]
struct Point {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewMetadata {
    flow_type: String,
    preview_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    origin: Point,
    destinations: Vec<Point>,
    rider: Option<String>,
    has_return: bool,
    waiting_time: i32,
    gateway: String,
    initiated_via: String,
    metadata: PreviewMetadata,
}

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    data: Option<PreviewData>,
}

#[derive(Debug, Deserialize)]
struct PreviewData {
    #[serde(default)]
    categories: Vec<PreviewCategory>,
}

#[derive(Debug, Deserialize)]
struct PreviewCategory {
    #[serde(default)]
    items: Vec<PreviewItem>,
}

#[derive(Debug, Deserialize)]
struct PreviewItem {
    service: Option<PreviewService>,
}

#[derive(Debug, Deserialize)]
struct PreviewService {
    #[serde(default)]
    prices: Vec<PreviewPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewPrice {
    passenger_share: i64,
}

impl TapsiClient {
    pub fn new(access_token: String, cookie: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            access_token,
            cookie,
        }
    }
}

#[async_trait]
impl PriceProvider for TapsiClient {
    fn name(&self) -> RideProvider {
        RideProvider::Tapsi
    }

    async fn estimate(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<i64, PoiError> {
        let payload = PreviewRequest {
            origin: Point {
                latitude: origin.lat,
                longitude: origin.lng,
            },
            destinations: vec![Point {
                latitude: destination.lat,
                longitude: destination.lng,
            }],
            rider: None,
            has_return: false,
            waiting_time: 0,
            gateway: "CAB".to_string(),
            initiated_via: "WEB".to_string(),
            metadata: PreviewMetadata {
                flow_type: "DESTINATION_FIRST".to_string(),
                preview_type: "ORIGIN_FIRST".to_string(),
            },
        };

        let response = self
            .client
            .post(PREVIEW_URL)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Cookie", &self.cookie)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Tapsi request failed: {}", e);
                PoiError::Upstream(format!("tapsi request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!("Unexpected status code from Tapsi API: {}", status);
            return Err(PoiError::Upstream(format!("tapsi status: {}", status)));
        }

        let body: PreviewResponse = response.json().await.map_err(|e| {
            log::warn!("Failed to parse Tapsi response: {}", e);
            PoiError::Upstream(format!("tapsi parse error: {}", e))
        })?;

        let price = body
            .data
            .and_then(|d| d.categories.into_iter().next())
            .and_then(|c| c.items.into_iter().next())
            .and_then(|i| i.service)
            .and_then(|s| s.prices.into_iter().next())
            .map(|p| p.passenger_share)
            .ok_or_else(|| PoiError::Upstream("no price in tapsi response".to_string()))?;

        if price == 0 {
            return Err(PoiError::Upstream("zero price from tapsi".to_string()));
        }

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_response_parsing() {
        let raw = r#"{
            "data": {
                "categories": [
                    {
                        "items": [
                            { "service": { "prices": [{ "passengerShare": 98000 }] } }
                        ]
                    }
                ]
            }
        }"#;

        let parsed: PreviewResponse = serde_json::from_str(raw).unwrap();
        let share = parsed.data.unwrap().categories[0].items[0]
            .service
            .as_ref()
            .unwrap()
            .prices[0]
            .passenger_share;
        assert_eq!(share, 98_000);
    }

    #[test]
    fn test_preview_response_without_categories() {
        let parsed: PreviewResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(parsed.data.unwrap().categories.is_empty());
    }
}
