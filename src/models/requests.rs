use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{BookingRequest, ChefRate, ChefSummary, GeoPoint, ServiceTypeId};

/// Booking form as posted by the UI
///
/// Every field may still be missing while the customer fills the form in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookingForm {
    #[serde(alias = "service_type", rename = "serviceType", default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(alias = "guest_count", rename = "guestCount", default)]
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[validate(length(max = 32))]
    #[serde(alias = "selected_add_ons", rename = "selectedAddOns", default)]
    pub selected_add_ons: Vec<String>,
}

impl BookingForm {
    /// Convert to a [`BookingRequest`]; an unrecognised service type becomes `None`
    pub fn into_booking(self) -> BookingRequest {
        let service_type = self.service_type.as_deref().and_then(|raw| {
            match raw.parse::<ServiceTypeId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!("Unrecognised service type '{}'", raw);
                    None
                }
            }
        });

        BookingRequest {
            service_type,
            duration: self.duration,
            guest_count: self.guest_count,
            date: self.date,
            selected_add_ons: self.selected_add_ons.into_iter().collect(),
        }
    }
}

/// Request to price a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteRequest {
    #[serde(alias = "chef_rate", rename = "chefRate", default)]
    pub chef_rate: Option<ChefRate>,
    #[validate(nested)]
    #[serde(default)]
    pub booking: BookingForm,
}

/// Request to geocode a free-text address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeocodeRequest {
    #[validate(length(max = 512))]
    pub address: String,
}

/// Request to rank a chef list around a known origin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(default)]
    pub origin: Option<GeoPoint>,
    #[validate(length(max = 1000))]
    pub chefs: Vec<ChefSummary>,
}

/// Request to search the chef directory around an address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyRequest {
    #[validate(length(max = 512))]
    pub address: String,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}
