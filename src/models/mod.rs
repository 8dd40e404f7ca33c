// Model exports
pub mod catalog;
pub mod domain;
pub mod requests;
pub mod responses;

pub use catalog::{AddOn, CatalogError, GuestTier, ServiceCatalog, ServiceType, ServiceTypeId};
pub use domain::{BookingRequest, ChefRate, ChefSummary, GeoPoint, PriceBreakdown};
pub use requests::{BookingForm, GeocodeRequest, NearbyRequest, QuoteRequest, RankRequest};
pub use responses::{ErrorResponse, GeocodeResponse, HealthResponse, NearbyResponse, QuoteResponse, RankResponse};
