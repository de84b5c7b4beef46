// src/services/price_service.rs
// DOCUMENTATION: Multi-provider ride-price aggregation
// PURPOSE: Collect fare estimates from every configured provider, tolerating
// individual provider failures

use crate::errors::PoiError;
use crate::models::{Coordinate, PriceQuote, RideProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// One ride-hailing price source
/// DOCUMENTATION: Providers are flaky by nature (rate limits, expired
/// sessions); a failing provider must never take the whole feature down.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> RideProvider;

    /// Estimated fare for the trip, in Toman
    async fn estimate(&self, origin: Coordinate, destination: Coordinate)
        -> Result<i64, PoiError>;
}

/// Price aggregation service
pub struct PriceService {
    providers: Vec<Arc<dyn PriceProvider>>,
}

impl PriceService {
    pub fn new(providers: Vec<Arc<dyn PriceProvider>>) -> Self {
        Self { providers }
    }

    /// Query every provider for one origin/destination pair
    /// DOCUMENTATION: A provider error is logged and recorded as unavailable;
    /// the call fails with `NoQuote` only when no provider returned a price.
    pub async fn get_price(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<PriceQuote, PoiError> {
        origin.validate()?;
        destination.validate()?;

        let mut quote = PriceQuote::default();
        for provider in &self.providers {
            match provider.estimate(origin, destination).await {
                Ok(price) => {
                    quote.quotes.insert(provider.name(), Some(price));
                }
                Err(e) => {
                    log::warn!("{} price error: {}", provider.name().as_str(), e);
                    quote.quotes.insert(provider.name(), None);
                }
            }
        }

        if quote.available_count() == 0 {
            return Err(PoiError::NoQuote);
        }
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        name: RideProvider,
        result: Result<i64, ()>,
    }

    #[async_trait]
    impl PriceProvider for StubProvider {
        fn name(&self) -> RideProvider {
            self.name
        }

        async fn estimate(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> Result<i64, PoiError> {
            self.result
                .map_err(|_| PoiError::Upstream("injected provider failure".to_string()))
        }
    }

    fn provider(name: RideProvider, result: Result<i64, ()>) -> Arc<dyn PriceProvider> {
        Arc::new(StubProvider { name, result })
    }

    const ORIGIN: Coordinate = Coordinate {
        lat: 35.7000,
        lng: 51.4000,
    };
    const DESTINATION: Coordinate = Coordinate {
        lat: 35.7448,
        lng: 51.3753,
    };

    #[tokio::test]
    async fn test_all_providers_succeed() {
        let service = PriceService::new(vec![
            provider(RideProvider::Snapp, Ok(120_000)),
            provider(RideProvider::Tapsi, Ok(110_000)),
        ]);

        let quote = service.get_price(ORIGIN, DESTINATION).await.unwrap();
        assert_eq!(quote.quotes[&RideProvider::Snapp], Some(120_000));
        assert_eq!(quote.quotes[&RideProvider::Tapsi], Some(110_000));
    }

    #[tokio::test]
    async fn test_partial_failure_returns_surviving_quote() {
        let service = PriceService::new(vec![
            provider(RideProvider::Snapp, Err(())),
            provider(RideProvider::Tapsi, Ok(98_000)),
        ]);

        let quote = service.get_price(ORIGIN, DESTINATION).await.unwrap();
        assert_eq!(quote.quotes[&RideProvider::Snapp], None);
        assert_eq!(quote.quotes[&RideProvider::Tapsi], Some(98_000));
        assert_eq!(quote.available_count(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_is_no_quote() {
        let service = PriceService::new(vec![
            provider(RideProvider::Snapp, Err(())),
            provider(RideProvider::Tapsi, Err(())),
        ]);

        let result = service.get_price(ORIGIN, DESTINATION).await;
        assert!(matches!(result, Err(PoiError::NoQuote)));
    }

    #[tokio::test]
    async fn test_sentinel_coordinates_rejected() {
        let service = PriceService::new(vec![provider(RideProvider::Snapp, Ok(1))]);

        let result = service
            .get_price(Coordinate::new(0.0, 0.0), DESTINATION)
            .await;
        assert!(matches!(result, Err(PoiError::InvalidCoordinate(_))));
    }
}
