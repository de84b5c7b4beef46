// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache_writer;
pub mod neshan_client;
pub mod poi_service;
pub mod price_service;
pub mod snapp_client;
pub mod tapsi_client;
pub mod units;

pub use cache_writer::*;
pub use neshan_client::*;
pub use poi_service::*;
pub use price_service::*;
pub use snapp_client::*;
pub use tapsi_client::*;
