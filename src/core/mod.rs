// Core algorithm exports
pub mod distance;
pub mod engine;
pub mod pricing;
pub mod ranking;

pub use distance::{haversine, haversine_km};
pub use engine::{BookingEngine, NearbyResult};
pub use pricing::{compute_quote, guest_multiplier, is_weekend};
pub use ranking::{compare_ranked, rank_by_proximity};
