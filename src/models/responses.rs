use serde::{Deserialize, Serialize};
use crate::models::{ChefSummary, GeoPoint, PriceBreakdown};

/// Response for the quote endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: PriceBreakdown,
}

/// Response for the geocode endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub location: Option<GeoPoint>,
    pub found: bool,
}

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub chefs: Vec<ChefSummary>,
    pub total_results: usize,
}

/// Response for the nearby search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub origin: Option<GeoPoint>,
    pub location_found: bool,
    pub chefs: Vec<ChefSummary>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
