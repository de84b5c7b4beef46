// src/models/price.rs
// DOCUMENTATION: Ride-price quote structures
// PURPOSE: Ephemeral fare estimates per provider, never persisted

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configured ride-hailing providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideProvider {
    Snapp,
    Tapsi,
}

impl RideProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideProvider::Snapp => "snapp",
            RideProvider::Tapsi => "tapsi",
        }
    }
}

/// Fare estimates for one origin/destination pair
/// DOCUMENTATION: `None` means the provider was queried but failed; a provider
/// that was never configured has no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(flatten)]
    pub quotes: HashMap<RideProvider, Option<i64>>,
}

impl PriceQuote {
    /// Number of providers that actually returned a price
    pub fn available_count(&self) -> usize {
        self.quotes.values().filter(|q| q.is_some()).count()
    }
}
