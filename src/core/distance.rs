use crate::models::GeoPoint;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, rounded to the nearest meter
///
/// Returns `None` when either point is outside the valid latitude/longitude range.
#[inline]
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> Option<u64> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }

    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding error can push h a hair past 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    Some((EARTH_RADIUS_M * c).round() as u64)
}

/// Distance in kilometers, for display
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> Option<f64> {
    haversine(a, b).map(|meters| meters as f64 / 1000.0)
}
