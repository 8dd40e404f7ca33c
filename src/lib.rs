//! Chef Booking Engine - quote and proximity ranking for the chef marketplace
//!
//! This library prices customer bookings against a chef's hourly rate and ranks
//! chef search results by great-circle distance from a geocoded location.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compute_quote, haversine, rank_by_proximity, BookingEngine};
pub use crate::models::{BookingRequest, ChefRate, ChefSummary, GeoPoint, PriceBreakdown, ServiceCatalog, ServiceTypeId};
pub use crate::services::{Geocoder, RetryPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let point = GeoPoint::new(19.076, 72.8777);
        assert_eq!(haversine(&point, &point), Some(0));
        assert!(compute_quote(&ServiceCatalog::standard(), None, &BookingRequest::default()).is_empty());
    }
}
