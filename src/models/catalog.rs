use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading the service catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Booking category offered on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTypeId {
    Birthday,
    #[serde(alias = "wedding")]
    Marriage,
    Daily,
}

impl ServiceTypeId {
    pub const ALL: [ServiceTypeId; 3] = [
        ServiceTypeId::Birthday,
        ServiceTypeId::Marriage,
        ServiceTypeId::Daily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTypeId::Birthday => "birthday",
            ServiceTypeId::Marriage => "marriage",
            ServiceTypeId::Daily => "daily",
        }
    }
}

impl fmt::Display for ServiceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceTypeId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "birthday" => Ok(ServiceTypeId::Birthday),
            "marriage" | "wedding" => Ok(ServiceTypeId::Marriage),
            "daily" => Ok(ServiceTypeId::Daily),
            other => Err(CatalogError::Invalid(format!("unknown service type '{}'", other))),
        }
    }
}

/// Step in the guest-count pricing function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuestTier {
    /// Applies when the guest count is strictly greater than this
    pub threshold: u32,
    pub multiplier: Decimal,
}

/// Optional extra priced per booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub name: String,
    pub price: Decimal,
}

impl AddOn {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Pricing rules for one service type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: ServiceTypeId,
    pub base_multiplier: Decimal,
    pub min_duration: i64,
    pub max_duration: i64,
    /// Ascending by threshold
    #[serde(default)]
    pub guest_tiers: Vec<GuestTier>,
    /// Whether Saturday/Sunday events pay the catalog's weekend premium
    #[serde(default)]
    pub weekend_surcharge: bool,
    /// Service-specific add-ons, on top of the catalog's base add-ons
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

/// Immutable service and add-on catalog
///
/// Loaded once at startup and passed explicitly to the quote calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalog {
    /// Hourly rate used when a chef has not published one
    pub fallback_rate: Decimal,
    pub weekend_premium: Decimal,
    /// Add-ons available for every service type
    #[serde(default)]
    pub base_add_ons: Vec<AddOn>,
    pub services: Vec<ServiceType>,
}

impl ServiceCatalog {
    /// Built-in catalog, identical to `config/catalog.toml`
    pub fn standard() -> Self {
        let tier = |threshold: u32, multiplier: i64| GuestTier {
            threshold,
            multiplier: Decimal::new(multiplier, 2),
        };

        Self {
            fallback_rate: Decimal::from(1000),
            weekend_premium: Decimal::new(12, 1),
            base_add_ons: vec![AddOn::new("Cleanup", Decimal::from(150))],
            services: vec![
                ServiceType {
                    id: ServiceTypeId::Birthday,
                    base_multiplier: Decimal::new(15, 1),
                    min_duration: 2,
                    max_duration: 8,
                    guest_tiers: vec![tier(10, 115), tier(20, 130), tier(50, 150)],
                    weekend_surcharge: true,
                    add_ons: vec![
                        AddOn::new("Cake", Decimal::from(500)),
                        AddOn::new("Decoration", Decimal::from(800)),
                    ],
                },
                ServiceType {
                    id: ServiceTypeId::Marriage,
                    base_multiplier: Decimal::from(2),
                    min_duration: 4,
                    max_duration: 12,
                    guest_tiers: vec![tier(50, 120), tier(100, 140), tier(200, 160)],
                    weekend_surcharge: true,
                    add_ons: vec![
                        AddOn::new("Catering Staff", Decimal::from(2000)),
                        AddOn::new("Live Counter", Decimal::from(1500)),
                    ],
                },
                ServiceType {
                    id: ServiceTypeId::Daily,
                    base_multiplier: Decimal::new(8, 1),
                    min_duration: 1,
                    max_duration: 4,
                    guest_tiers: vec![tier(6, 110), tier(10, 125)],
                    weekend_surcharge: false,
                    add_ons: vec![
                        AddOn::new("Grocery Shopping", Decimal::from(200)),
                        AddOn::new("Meal Prep", Decimal::from(300)),
                    ],
                },
            ],
        }
    }

    /// Parse and validate a TOML catalog document
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let catalog: ServiceCatalog = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a TOML catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn service(&self, id: ServiceTypeId) -> Option<&ServiceType> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Base add-ons followed by the service-specific ones
    pub fn add_ons_for(&self, id: ServiceTypeId) -> Vec<&AddOn> {
        let specific = self
            .service(id)
            .map(|s| s.add_ons.as_slice())
            .unwrap_or_default();

        self.base_add_ons.iter().chain(specific.iter()).collect()
    }

    pub fn add_on_price(&self, id: ServiceTypeId, name: &str) -> Option<Decimal> {
        self.add_ons_for(id)
            .into_iter()
            .find(|a| a.name == name)
            .map(|a| a.price)
    }

    /// Check the structural invariants every pricing rule relies on
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.fallback_rate <= Decimal::ZERO {
            return Err(CatalogError::Invalid("fallback_rate must be positive".into()));
        }
        if self.weekend_premium < Decimal::ONE {
            return Err(CatalogError::Invalid("weekend_premium must be at least 1".into()));
        }

        let mut seen_ids = HashSet::new();
        for service in &self.services {
            let id = service.id;
            if !seen_ids.insert(id) {
                return Err(CatalogError::Invalid(format!("service type {} defined twice", id)));
            }
            if service.base_multiplier < Decimal::ZERO {
                return Err(CatalogError::Invalid(format!("{}: base_multiplier is negative", id)));
            }
            if id == ServiceTypeId::Daily && service.weekend_surcharge {
                return Err(CatalogError::Invalid(format!(
                    "{}: daily service never pays the weekend premium",
                    id
                )));
            }
            if service.min_duration > service.max_duration {
                return Err(CatalogError::Invalid(format!(
                    "{}: min_duration {} exceeds max_duration {}",
                    id, service.min_duration, service.max_duration
                )));
            }

            for pair in service.guest_tiers.windows(2) {
                if pair[1].threshold <= pair[0].threshold {
                    return Err(CatalogError::Invalid(format!(
                        "{}: guest tiers must be ascending by threshold",
                        id
                    )));
                }
                if pair[1].multiplier < pair[0].multiplier {
                    return Err(CatalogError::Invalid(format!(
                        "{}: guest tier multipliers must not decrease",
                        id
                    )));
                }
            }

            let mut names = HashSet::new();
            for add_on in self.add_ons_for(id) {
                if add_on.price < Decimal::ZERO {
                    return Err(CatalogError::Invalid(format!(
                        "{}: add-on '{}' has a negative price",
                        id, add_on.name
                    )));
                }
                if !names.insert(add_on.name.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "{}: add-on '{}' defined twice",
                        id, add_on.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED_CATALOG: &str = include_str!("../../config/catalog.toml");

    #[test]
    fn test_standard_catalog_is_valid() {
        assert!(ServiceCatalog::standard().validate().is_ok());
    }

    #[test]
    fn test_bundled_file_matches_standard() {
        let catalog = ServiceCatalog::from_toml_str(BUNDLED_CATALOG).unwrap();
        assert_eq!(catalog, ServiceCatalog::standard());
    }

    #[test]
    fn test_cleanup_in_every_scope() {
        let catalog = ServiceCatalog::standard();
        for id in ServiceTypeId::ALL {
            assert_eq!(catalog.add_on_price(id, "Cleanup"), Some(Decimal::from(150)));
        }
    }

    #[test]
    fn test_service_specific_add_ons_are_scoped() {
        let catalog = ServiceCatalog::standard();
        assert_eq!(catalog.add_on_price(ServiceTypeId::Birthday, "Cake"), Some(Decimal::from(500)));
        assert_eq!(catalog.add_on_price(ServiceTypeId::Daily, "Cake"), None);
    }

    #[test]
    fn test_service_type_parsing() {
        assert_eq!("Birthday".parse::<ServiceTypeId>().unwrap(), ServiceTypeId::Birthday);
        assert_eq!(" wedding ".parse::<ServiceTypeId>().unwrap(), ServiceTypeId::Marriage);
        assert!("brunch".parse::<ServiceTypeId>().is_err());
    }

    #[test]
    fn test_rejects_inverted_duration_bounds() {
        let mut catalog = ServiceCatalog::standard();
        catalog.services[0].min_duration = 9;
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn test_rejects_weekend_surcharge_on_daily() {
        let mut catalog = ServiceCatalog::standard();
        let daily = catalog
            .services
            .iter_mut()
            .find(|s| s.id == ServiceTypeId::Daily)
            .unwrap();
        daily.weekend_surcharge = true;
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));

        let toml = BUNDLED_CATALOG.replacen("weekend_surcharge = false", "weekend_surcharge = true", 1);
        assert!(ServiceCatalog::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_unordered_tiers() {
        let mut catalog = ServiceCatalog::standard();
        catalog.services[0].guest_tiers.swap(0, 1);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_rejects_decreasing_tier_multiplier() {
        let mut catalog = ServiceCatalog::standard();
        catalog.services[0].guest_tiers[2].multiplier = Decimal::ONE;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_rejects_add_on_shadowing_base() {
        let mut catalog = ServiceCatalog::standard();
        catalog.services[2]
            .add_ons
            .push(AddOn::new("Cleanup", Decimal::from(99)));
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_parse_error_reported() {
        let result = ServiceCatalog::from_toml_str("fallback_rate = \"lots\"");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
