use std::sync::Arc;

use crate::core::{pricing::compute_quote, ranking::rank_by_proximity};
use crate::models::{BookingRequest, ChefRate, ChefSummary, GeoPoint, PriceBreakdown, ServiceCatalog};
use crate::services::Geocoder;

/// Result of a location search over a chef list
#[derive(Debug, Clone)]
pub struct NearbyResult {
    /// Geocoded search location, `None` when the address could not be resolved
    pub origin: Option<GeoPoint>,
    pub chefs: Vec<ChefSummary>,
}

impl NearbyResult {
    pub fn location_found(&self) -> bool {
        self.origin.is_some()
    }
}

/// Entry point for the booking UI and submission flow
///
/// Pricing and ranking are pure; the only suspension point is the geocoder.
/// Every call stands alone, so a caller issuing overlapping searches keeps
/// only the latest result.
#[derive(Clone)]
pub struct BookingEngine {
    catalog: Arc<ServiceCatalog>,
    geocoder: Geocoder,
}

impl BookingEngine {
    pub fn new(catalog: Arc<ServiceCatalog>, geocoder: Geocoder) -> Self {
        Self { catalog, geocoder }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Price a booking; the returned total is what the booking is persisted with
    pub fn quote(&self, chef_rate: Option<&ChefRate>, request: &BookingRequest) -> PriceBreakdown {
        compute_quote(&self.catalog, chef_rate, request)
    }

    /// Resolve an address for the add-location-to-profile flow
    pub async fn locate(&self, address: &str) -> Option<GeoPoint> {
        self.geocoder.geocode(address).await
    }

    /// Re-rank an already geocoded search
    pub fn rank(&self, origin: Option<&GeoPoint>, chefs: Vec<ChefSummary>) -> Vec<ChefSummary> {
        rank_by_proximity(origin, chefs)
    }

    /// Geocode a search location and order chefs by distance from it
    ///
    /// An unresolvable address degrades to rating order.
    pub async fn search_nearby(&self, address: &str, chefs: Vec<ChefSummary>) -> NearbyResult {
        let origin = self.geocoder.geocode(address).await;
        if origin.is_none() {
            tracing::info!("Location '{}' not found, ranking {} chefs by rating", address.trim(), chefs.len());
        }

        let chefs = rank_by_proximity(origin.as_ref(), chefs);
        NearbyResult { origin, chefs }
    }
}
