use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::models::{
    BookingRequest, ChefRate, GuestTier, PriceBreakdown, ServiceCatalog, ServiceType,
};

/// Compute the quote for a booking against a chef's rate
///
/// Pricing formula:
/// total = round(
///     rate * base_multiplier       # service-adjusted hourly rate
///     * clamp(duration)            # hours within the service bounds
///     * guest_multiplier           # step function over guest tiers
///     * weekend_multiplier         # 1, or the premium on weekends
///     + add_on_total               # base and service-specific extras
/// )
///
/// An unknown service type or missing chef rate yields [`PriceBreakdown::empty`].
pub fn compute_quote(
    catalog: &ServiceCatalog,
    chef_rate: Option<&ChefRate>,
    request: &BookingRequest,
) -> PriceBreakdown {
    let Some(service_id) = request.service_type else {
        return PriceBreakdown::empty();
    };
    let Some(service) = catalog.service(service_id) else {
        tracing::debug!("Service type {} not in catalog, quote not computable", service_id);
        return PriceBreakdown::empty();
    };
    let Some(chef_rate) = chef_rate else {
        return PriceBreakdown::empty();
    };

    let duration = request.effective_duration(service.min_duration, service.max_duration);
    let guest_count = request.effective_guest_count();

    let guest_multiplier = guest_multiplier(&service.guest_tiers, guest_count);
    let weekend_multiplier = weekend_multiplier(catalog, service, request.date);
    let add_on_total = add_on_total(catalog, service, request);

    let amounts = chef_rate
        .effective(catalog.fallback_rate)
        .checked_mul(service.base_multiplier)
        .and_then(|base_rate| {
            let base_total = base_rate
                .checked_mul(Decimal::from(duration))?
                .checked_mul(guest_multiplier)?
                .checked_mul(weekend_multiplier)?;
            let subtotal = base_total.checked_add(add_on_total?)?;
            let total = round_to_unit(subtotal)?;
            Some((base_rate, base_total, subtotal, total))
        });
    let Some((base_rate, base_total, subtotal, total)) = amounts else {
        tracing::warn!(
            "Quote for {} overflows decimal range (rate {:?}), not computable",
            service_id,
            chef_rate.price_per_hour
        );
        return PriceBreakdown::empty();
    };
    let add_on_total = add_on_total.unwrap_or_default();

    tracing::debug!(
        "Quote for {}: {}h x {} guests -> subtotal {} total {}",
        service_id,
        duration,
        guest_count,
        subtotal,
        total
    );

    PriceBreakdown {
        service_type: Some(service_id),
        base_rate,
        duration,
        requested_duration: request.duration,
        guest_count,
        guest_multiplier,
        weekend_multiplier,
        base_total,
        add_on_total,
        subtotal,
        total,
        computable: true,
    }
}

/// Multiplier of the highest tier whose threshold is strictly below `guest_count`
///
/// Tiers are scanned from the top down and the first match wins, so the result
/// is a step function. No match means a multiplier of 1.
#[inline]
pub fn guest_multiplier(tiers: &[GuestTier], guest_count: u32) -> Decimal {
    tiers
        .iter()
        .rev()
        .find(|tier| guest_count > tier.threshold)
        .map(|tier| tier.multiplier)
        .unwrap_or(Decimal::ONE)
}

/// Saturday or Sunday
#[inline]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn weekend_multiplier(
    catalog: &ServiceCatalog,
    service: &ServiceType,
    date: Option<NaiveDate>,
) -> Decimal {
    match date {
        Some(date) if service.weekend_surcharge && is_weekend(date) => catalog.weekend_premium,
        _ => Decimal::ONE,
    }
}

/// Sum of the selected add-on prices; names outside the catalog contribute zero
///
/// `None` when the sum leaves the decimal range.
fn add_on_total(
    catalog: &ServiceCatalog,
    service: &ServiceType,
    request: &BookingRequest,
) -> Option<Decimal> {
    request
        .selected_add_ons
        .iter()
        .map(|name| match catalog.add_on_price(service.id, name) {
            Some(price) => price,
            None => {
                tracing::warn!("Ignoring unknown add-on '{}' for service {}", name, service.id);
                Decimal::ZERO
            }
        })
        .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(price))
}

/// Round half-up to a whole currency unit, `None` past the `i64` range
fn round_to_unit(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddOn, ServiceTypeId};

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 18).unwrap()
    }

    fn rate(price: i64) -> ChefRate {
        ChefRate::per_hour(Decimal::from(price))
    }

    #[test]
    fn test_birthday_saturday_with_cleanup() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Birthday)
            .duration(4)
            .guests(15)
            .on(saturday())
            .add_on("Cleanup");

        let quote = compute_quote(&catalog, Some(&rate(1000)), &request);

        assert_eq!(quote.base_rate, Decimal::from(1500));
        assert_eq!(quote.guest_multiplier, Decimal::new(115, 2));
        assert_eq!(quote.weekend_multiplier, Decimal::new(12, 1));
        assert_eq!(quote.base_total, Decimal::from(8280));
        assert_eq!(quote.add_on_total, Decimal::from(150));
        assert_eq!(quote.subtotal, Decimal::from(8430));
        assert_eq!(quote.total, 8430);
    }

    #[test]
    fn test_daily_two_hours_single_guest() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Daily)
            .duration(2)
            .guests(1)
            .on(saturday());

        let quote = compute_quote(&catalog, Some(&rate(1200)), &request);

        assert_eq!(quote.base_rate, Decimal::from(960));
        assert_eq!(quote.guest_multiplier, Decimal::ONE);
        assert_eq!(quote.weekend_multiplier, Decimal::ONE);
        assert_eq!(quote.total, 1920);
    }

    #[test]
    fn test_marriage_on_tuesday_has_no_premium() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Marriage)
            .duration(6)
            .guests(80)
            .on(tuesday());

        let quote = compute_quote(&catalog, Some(&rate(1000)), &request);

        assert_eq!(quote.weekend_multiplier, Decimal::ONE);
        // 2000 * 6 * 1.2
        assert_eq!(quote.total, 14400);
    }

    #[test]
    fn test_missing_date_has_no_premium() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Birthday).duration(2);
        let quote = compute_quote(&catalog, Some(&rate(1000)), &request);
        assert_eq!(quote.weekend_multiplier, Decimal::ONE);
        assert_eq!(quote.total, 3000);
    }

    #[test]
    fn test_missing_chef_rate_is_empty() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Birthday).duration(4);
        let quote = compute_quote(&catalog, None, &request);
        assert!(quote.is_empty());
        assert_eq!(quote, PriceBreakdown::empty());
    }

    #[test]
    fn test_service_outside_catalog_is_empty() {
        let mut catalog = ServiceCatalog::standard();
        catalog.services.retain(|s| s.id != ServiceTypeId::Daily);

        let request = BookingRequest::new(ServiceTypeId::Daily).duration(2);
        assert!(compute_quote(&catalog, Some(&rate(1000)), &request).is_empty());
        assert!(compute_quote(&catalog, Some(&rate(1000)), &BookingRequest::default()).is_empty());
    }

    #[test]
    fn test_zero_rate_uses_fallback() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Daily).duration(1);
        let quote = compute_quote(&catalog, Some(&ChefRate::default()), &request);
        assert_eq!(quote.base_rate, Decimal::from(800));
        assert_eq!(quote.total, 800);
    }

    #[test]
    fn test_duration_is_clamped_but_raw_kept() {
        let catalog = ServiceCatalog::standard();

        let long = BookingRequest::new(ServiceTypeId::Daily).duration(1_000_000);
        let quote = compute_quote(&catalog, Some(&rate(1000)), &long);
        assert_eq!(quote.duration, 4);
        assert_eq!(quote.requested_duration, Some(1_000_000));

        let negative = BookingRequest::new(ServiceTypeId::Daily).duration(-5);
        let quote = compute_quote(&catalog, Some(&rate(1000)), &negative);
        assert_eq!(quote.duration, 1);
        assert_eq!(quote.requested_duration, Some(-5));

        let missing = BookingRequest::new(ServiceTypeId::Marriage);
        let quote = compute_quote(&catalog, Some(&rate(1000)), &missing);
        assert_eq!(quote.duration, 4);
        assert_eq!(quote.requested_duration, None);
    }

    #[test]
    fn test_guest_tiers_step_function() {
        let tiers = ServiceCatalog::standard().services[0].guest_tiers.clone();

        assert_eq!(guest_multiplier(&tiers, 1), Decimal::ONE);
        assert_eq!(guest_multiplier(&tiers, 10), Decimal::ONE);
        assert_eq!(guest_multiplier(&tiers, 11), Decimal::new(115, 2));
        assert_eq!(guest_multiplier(&tiers, 20), Decimal::new(115, 2));
        assert_eq!(guest_multiplier(&tiers, 21), Decimal::new(130, 2));
        assert_eq!(guest_multiplier(&tiers, 500), Decimal::new(150, 2));
        assert_eq!(guest_multiplier(&[], 500), Decimal::ONE);
    }

    #[test]
    fn test_guest_multiplier_monotonic() {
        let catalog = ServiceCatalog::standard();
        for service in &catalog.services {
            let mut previous = Decimal::ZERO;
            for guests in 1..=300 {
                let current = guest_multiplier(&service.guest_tiers, guests);
                assert!(current >= previous, "{} guests for {}", guests, service.id);
                previous = current;
            }
        }
    }

    #[test]
    fn test_unknown_add_on_is_ignored() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Daily)
            .duration(1)
            .add_on("Cleanup")
            .add_on("Cake")
            .add_on("Clenaup");

        let quote = compute_quote(&catalog, Some(&rate(1000)), &request);
        assert_eq!(quote.add_on_total, Decimal::from(150));
    }

    #[test]
    fn test_rounds_half_up() {
        let mut catalog = ServiceCatalog::standard();
        catalog.base_add_ons = vec![AddOn::new("Cleanup", Decimal::new(5, 1))];

        let request = BookingRequest::new(ServiceTypeId::Daily)
            .duration(1)
            .add_on("Cleanup");
        let quote = compute_quote(&catalog, Some(&rate(1000)), &request);

        assert_eq!(quote.subtotal, Decimal::new(8005, 1));
        assert_eq!(quote.total, 801);
    }

    #[test]
    fn test_rate_overflowing_decimal_is_empty() {
        let catalog = ServiceCatalog::standard();
        let chef_rate: ChefRate = serde_json::from_str(r#"{"pricePerHour": 1e28}"#).unwrap();
        let request = BookingRequest::new(ServiceTypeId::Marriage)
            .duration(12)
            .guests(500)
            .on(saturday())
            .add_on("Live Counter");

        let quote = compute_quote(&catalog, Some(&chef_rate), &request);
        assert!(quote.is_empty());
    }

    #[test]
    fn test_total_past_integer_range_is_empty() {
        let catalog = ServiceCatalog::standard();
        let chef_rate = ChefRate::per_hour(Decimal::from(u64::MAX));
        let request = BookingRequest::new(ServiceTypeId::Daily).duration(1);

        assert!(compute_quote(&catalog, Some(&chef_rate), &request).is_empty());
    }

    #[test]
    fn test_weekend_detection() {
        assert!(is_weekend(saturday()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()));
        assert!(!is_weekend(tuesday()));
    }

    #[test]
    fn test_quote_is_deterministic() {
        let catalog = ServiceCatalog::standard();
        let request = BookingRequest::new(ServiceTypeId::Marriage)
            .duration(7)
            .guests(150)
            .on(saturday())
            .add_on("Live Counter")
            .add_on("Cleanup");

        let first = compute_quote(&catalog, Some(&rate(1333)), &request);
        let second = compute_quote(&catalog, Some(&rate(1333)), &request);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
