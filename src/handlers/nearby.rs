// src/handlers/nearby.rs
// DOCUMENTATION: HTTP handlers for POI and ride-price lookups
// PURPOSE: Parse requests, call services, return responses

use crate::errors::PoiError;
use crate::models::Coordinate;
use crate::services::{PoiService, PriceService};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    /// Listing identifier the resolved POIs are cached under
    #[validate(length(min = 1, message = "post_token must not be empty"))]
    pub post_token: String,

    #[validate(range(min = -90.0, max = 90.0, message = "lat out of range"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "lng out of range"))]
    pub lng: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PriceQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "origin_lat out of range"))]
    pub origin_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "origin_lng out of range"))]
    pub origin_lng: f64,

    #[validate(range(min = -90.0, max = 90.0, message = "destination_lat out of range"))]
    pub destination_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "destination_lng out of range"))]
    pub destination_lng: f64,
}

/// GET /nearby-pois
/// Resolve the nearest POIs per category around a listing coordinate
pub async fn nearby_pois(
    service: web::Data<PoiService>,
    query: web::Query<NearbyQuery>,
) -> Result<impl Responder, PoiError> {
    // Validate request
    if let Err(e) = query.validate() {
        return Err(PoiError::Validation(e.to_string()));
    }

    let origin = Coordinate {
        lat: query.lat,
        lng: query.lng,
    };
    let pois = service
        .resolve_nearby_pois(&query.post_token, origin)
        .await?;
    Ok(HttpResponse::Ok().json(pois))
}

/// GET /ride-price
/// Fare estimates from every configured ride provider
pub async fn ride_price(
    service: web::Data<PriceService>,
    query: web::Query<PriceQuery>,
) -> Result<impl Responder, PoiError> {
    // Validate request
    if let Err(e) = query.validate() {
        return Err(PoiError::Validation(e.to_string()));
    }

    let origin = Coordinate {
        lat: query.origin_lat,
        lng: query.origin_lng,
    };
    let destination = Coordinate {
        lat: query.destination_lat,
        lng: query.destination_lng,
    };
    let quote = service.get_price(origin, destination).await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// Configuration for POI and price routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/nearby-pois", web::get().to(nearby_pois))
        .route("/ride-price", web::get().to(ride_price));
}
