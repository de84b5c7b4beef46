// src/services/snapp_client.rs
// DOCUMENTATION: Snapp ride-price provider
// PURPOSE: Fetch a fare estimate from the Snapp passenger pricing API

use crate::errors::PoiError;
use crate::models::{Coordinate, RideProvider};
use crate::services::price_service::PriceProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PRICE_URL: &str = "https://app.snapp.taxi/api/api-base/v2/passenger/newprice/s/6/0";

pub struct SnappClient {
    client: Client,
    access_token: String,
    /// Pre-assembled session cookie value; refreshing it is out of scope
    cookie: String,
}

#[derive(Debug, Serialize)]
struct PricePoint {
    lat: String,
    lng: String,
}

#[derive(Debug, Serialize)]
struct PriceRequest {
    points: Vec<PricePoint>,
    voucher_code: Option<String>,
    service_types: Vec<i32>,
    priceriderecom: bool,
    tag: String,
    #[serde(rename = "hurryRaised")]
    hurry_raised: i32,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    data: Option<PriceData>,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    #[serde(default)]
    prices: Vec<PriceEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    #[serde(rename = "final")]
    final_price: i64,
}

impl SnappClient {
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
impl PriceProvider for SnappClient {
    fn name(&self) -> RideProvider {
        RideProvider::Snapp
    }

    async fn estimate(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<i64, PoiError> {
        let payload = PriceRequest {
            points: vec![
                PricePoint {
                    lat: origin.lat.to_string(),
                    lng: origin.lng.to_string(),
                },
                PricePoint {
                    lat: destination.lat.to_string(),
                    lng: destination.lng.to_string(),
                },
            ],
            voucher_code: None,
            service_types: vec![1, 2, 24],
            priceriderecom: false,
            tag: "0".to_string(),
            hurry_raised: 0,
        };

        let response = self
            .client
            .post(PRICE_URL)
            .header("Content-Type", "application/json")
            .header("Origin", "https://app.snapp.taxi")
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Cookie", &self.cookie)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Snapp request failed: {}", e);
                PoiError::Upstream(format!("snapp request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!("Unexpected status code from Snapp API: {}", status);
            return Err(PoiError::Upstream(format!("snapp status: {}", status)));
        }

        let body: PriceResponse = response.json().await.map_err(|e| {
            log::warn!("Failed to parse Snapp response: {}", e);
            PoiError::Upstream(format!("snapp parse error: {}", e))
        })?;

        let price = body
            .data
            .and_then(|d| d.prices.into_iter().next())
            .map(|p| p.final_price)
            .ok_or_else(|| PoiError::Upstream("no price options in snapp response".to_string()))?;

        if price == 0 {
            return Err(PoiError::Upstream("zero price from snapp".to_string()));
        }

        // Snapp quotes in Rial; the rest of the system speaks Toman
        Ok(price / 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_response_parsing() {
        let raw = r#"{"data": {"prices": [{"final": 1450000}, {"final": 1800000}]}}"#;
        let parsed: PriceResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.unwrap().prices[0].final_price, 1_450_000);
    }

    #[test]
    fn test_price_response_without_data() {
        let parsed: PriceResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_none());
    }
}
