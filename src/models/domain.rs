use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::catalog::ServiceTypeId;

/// Geographic point in decimal degrees
///
/// Deserializes from either `{"lat": .., "lon": ..}` or a `[lat, lon]` tuple and
/// always serializes as the object form. Range is not enforced on construction;
/// use [`GeoPoint::is_valid`] before trusting a point from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeoPointRepr")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from the `[lat, lon]` tuple form used by map widgets
    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lon: pair[1],
        }
    }

    /// Back to the `[lat, lon]` tuple form
    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GeoPointRepr {
    Object {
        #[serde(alias = "latitude")]
        lat: f64,
        #[serde(alias = "lng", alias = "longitude")]
        lon: f64,
    },
    Pair([f64; 2]),
}

impl From<GeoPointRepr> for GeoPoint {
    fn from(repr: GeoPointRepr) -> Self {
        match repr {
            GeoPointRepr::Object { lat, lon } => GeoPoint::new(lat, lon),
            GeoPointRepr::Pair(pair) => GeoPoint::from_pair(pair),
        }
    }
}

/// Chef entry as supplied by the chef directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ratingAverage", default)]
    pub rating_average: Option<f64>,
    #[serde(rename = "locationCoords", default)]
    pub location_coords: Option<GeoPoint>,
    /// Populated by the ranker only
    #[serde(rename = "distanceMeters", default)]
    pub distance_meters: Option<u64>,
}

impl ChefSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            rating_average: None,
            location_coords: None,
            distance_meters: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating_average = Some(rating);
        self
    }

    pub fn with_location(mut self, point: GeoPoint) -> Self {
        self.location_coords = Some(point);
        self
    }

    /// Rating for ordering purposes; missing or non-finite ratings count as 0
    pub fn rating_or_zero(&self) -> f64 {
        self.rating_average
            .filter(|r| r.is_finite())
            .unwrap_or(0.0)
    }
}

/// Hourly rate published by a chef
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChefRate {
    #[serde(rename = "pricePerHour", default)]
    pub price_per_hour: Option<Decimal>,
}

impl ChefRate {
    pub fn per_hour(price: Decimal) -> Self {
        Self {
            price_per_hour: Some(price),
        }
    }

    /// Positive hourly price, or `fallback` when absent, zero or negative
    pub fn effective(&self, fallback: Decimal) -> Decimal {
        match self.price_per_hour {
            Some(price) if price > Decimal::ZERO => price,
            _ => fallback,
        }
    }
}

/// Booking selections collected by the UI, possibly only partially filled in
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "serviceType", default)]
    pub service_type: Option<ServiceTypeId>,
    /// Requested duration in hours, kept verbatim for display
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(rename = "guestCount", default)]
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "selectedAddOns", default)]
    pub selected_add_ons: BTreeSet<String>,
}

impl BookingRequest {
    pub fn new(service_type: ServiceTypeId) -> Self {
        Self {
            service_type: Some(service_type),
            ..Self::default()
        }
    }

    pub fn duration(mut self, hours: i64) -> Self {
        self.duration = Some(hours);
        self
    }

    pub fn guests(mut self, count: u32) -> Self {
        self.guest_count = Some(count);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn add_on(mut self, name: impl Into<String>) -> Self {
        self.selected_add_ons.insert(name.into());
        self
    }

    /// Guest count with the "missing means one guest" rule applied
    pub fn effective_guest_count(&self) -> u32 {
        self.guest_count.unwrap_or(1).max(1)
    }

    /// Duration clamped into `[min, max]`; a missing duration means `min`
    pub fn effective_duration(&self, min: i64, max: i64) -> i64 {
        self.duration.unwrap_or(min).clamp(min, max)
    }
}

/// Priced quote; a fresh value is produced for every input change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub service_type: Option<ServiceTypeId>,
    pub base_rate: Decimal,
    /// Effective (clamped) duration in hours
    pub duration: i64,
    pub requested_duration: Option<i64>,
    pub guest_count: u32,
    pub guest_multiplier: Decimal,
    pub weekend_multiplier: Decimal,
    /// Rate x duration x guest multiplier, after the weekend premium
    pub base_total: Decimal,
    pub add_on_total: Decimal,
    pub subtotal: Decimal,
    pub total: i64,
    pub computable: bool,
}

impl PriceBreakdown {
    /// Zero breakdown meaning "not yet computable"
    pub fn empty() -> Self {
        Self {
            service_type: None,
            base_rate: Decimal::ZERO,
            duration: 0,
            requested_duration: None,
            guest_count: 0,
            guest_multiplier: Decimal::ZERO,
            weekend_multiplier: Decimal::ZERO,
            base_total: Decimal::ZERO,
            add_on_total: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            total: 0,
            computable: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.computable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_object_and_pair_agree() {
        let from_object: GeoPoint = serde_json::from_str(r#"{"lat": 19.07, "lon": 72.87}"#).unwrap();
        let from_pair: GeoPoint = serde_json::from_str("[19.07, 72.87]").unwrap();

        assert_eq!(from_object, from_pair);
        assert_eq!(from_pair.lat, 19.07);
        assert_eq!(from_pair.lon, 72.87);
    }

    #[test]
    fn test_geo_point_accepts_lng_alias() {
        let point: GeoPoint = serde_json::from_str(r#"{"lat": 12.97, "lng": 77.59}"#).unwrap();
        assert_eq!(point, GeoPoint::new(12.97, 77.59));
    }

    #[test]
    fn test_geo_point_serializes_as_object() {
        let json = serde_json::to_value(GeoPoint::from_pair([28.61, 77.2])).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 28.61, "lon": 77.2}));
    }

    #[test]
    fn test_pair_round_trip_keeps_axes() {
        // Latitudes only go to 90, so an axis swap would be visible here
        let pair = [-33.86, 151.21];
        let point = GeoPoint::from_pair(pair);
        assert_eq!(point.lat, -33.86);
        assert_eq!(point.lon, 151.21);
        assert_eq!(point.to_pair(), pair);
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_chef_rate_fallback() {
        let fallback = Decimal::from(1000);
        assert_eq!(ChefRate::default().effective(fallback), fallback);
        assert_eq!(ChefRate::per_hour(Decimal::ZERO).effective(fallback), fallback);
        assert_eq!(ChefRate::per_hour(Decimal::from(1200)).effective(fallback), Decimal::from(1200));
    }

    #[test]
    fn test_booking_defaults() {
        let request = BookingRequest::new(ServiceTypeId::Birthday);
        assert_eq!(request.effective_guest_count(), 1);
        assert_eq!(request.effective_duration(2, 8), 2);

        let request = request.guests(0).duration(-3);
        assert_eq!(request.effective_guest_count(), 1);
        assert_eq!(request.effective_duration(2, 8), 2);
        assert_eq!(request.duration, Some(-3));
    }

    #[test]
    fn test_booking_request_from_json() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"serviceType": "marriage", "duration": 6, "guestCount": 120, "date": "2024-06-15", "selectedAddOns": ["Cleanup"]}"#,
        )
        .unwrap();

        assert_eq!(request.service_type, Some(ServiceTypeId::Marriage));
        assert_eq!(request.guest_count, Some(120));
        assert!(request.selected_add_ons.contains("Cleanup"));
    }
}
