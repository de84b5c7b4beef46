// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: One variant per failure class in the POI/price pipeline.
/// A cold cache is NOT an error: the read path signals it with `Ok(None)`,
/// so it never appears here.
#[derive(Error, Debug)]
pub enum PoiError {
    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("No POI found: {0}")]
    NotFound(String),

    #[error("No route found between origin and destination")]
    RouteNotFound,

    #[error("Unrecognized distance/duration format: {0}")]
    Format(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("No price available from any provider")]
    NoQuote,

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convert PoiError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PoiError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            PoiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            PoiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PoiError::RouteNotFound => (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
            // Format failures mean the upstream handed us text we cannot parse
            PoiError::Format(_) => (StatusCode::BAD_GATEWAY, "FORMAT_ERROR"),
            PoiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            PoiError::NoQuote => (StatusCode::BAD_GATEWAY, "NO_QUOTE"),
            PoiError::InvalidCoordinate(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATE"),
            PoiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PoiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PoiError::NotFound(_) => StatusCode::NOT_FOUND,
            PoiError::RouteNotFound => StatusCode::NOT_FOUND,
            PoiError::Format(_) => StatusCode::BAD_GATEWAY,
            PoiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PoiError::NoQuote => StatusCode::BAD_GATEWAY,
            PoiError::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
            PoiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}
