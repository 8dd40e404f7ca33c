use std::cmp::Ordering;

use crate::core::distance::haversine;
use crate::models::{ChefSummary, GeoPoint};

/// Annotate chefs with their distance from `origin` and sort them by proximity
///
/// # Ordering
/// 1. Chefs with a known distance, closest first
/// 2. Chefs without one, by rating descending (missing rating counts as 0)
///
/// The sort is stable, so ties keep the directory's order. A missing or invalid
/// origin leaves every chef without a distance, which reduces to rating order.
pub fn rank_by_proximity(origin: Option<&GeoPoint>, chefs: Vec<ChefSummary>) -> Vec<ChefSummary> {
    let origin = origin.filter(|point| {
        let valid = point.is_valid();
        if !valid {
            tracing::warn!("Ignoring out-of-range origin ({}, {})", point.lat, point.lon);
        }
        valid
    });

    let mut ranked: Vec<ChefSummary> = chefs
        .into_iter()
        .map(|mut chef| {
            chef.distance_meters = origin.and_then(|origin| distance_to(origin, &chef));
            chef
        })
        .collect();

    ranked.sort_by(compare_ranked);

    tracing::debug!(
        "Ranked {} chefs ({} with distance)",
        ranked.len(),
        ranked.iter().filter(|c| c.distance_meters.is_some()).count()
    );

    ranked
}

fn distance_to(origin: &GeoPoint, chef: &ChefSummary) -> Option<u64> {
    let coords = chef.location_coords.as_ref()?;
    let distance = haversine(origin, coords);
    if distance.is_none() {
        tracing::warn!(
            "Chef {} has out-of-range coordinates ({}, {}), ranking without distance",
            chef.id,
            coords.lat,
            coords.lon
        );
    }
    distance
}

/// Ordering used by [`rank_by_proximity`] once distances are populated
pub fn compare_ranked(a: &ChefSummary, b: &ChefSummary) -> Ordering {
    match (a.distance_meters, b.distance_meters) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.rating_or_zero().total_cmp(&a.rating_or_zero()),
    }
}
