use crate::models::{BoundingBox, UserProfile};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of latitude on the sphere above
const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Relative slack added to bounding boxes so they never cut off a point
/// that the exact great-circle test would accept
const BOUNDING_BOX_PADDING: f64 = 1.01;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two profiles' locations
#[inline]
pub fn profile_distance(from: &UserProfile, to: &UserProfile) -> f64 {
    haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than Haversine and used as a pre-filter only. The box is
/// padded slightly so it over-approximates the search circle; check
/// [`BoundingBox::is_simple`] before relying on it near the poles or the
/// antimeridian.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE * BOUNDING_BOX_PADDING;

    // Widest longitude reached by the spherical cap; a cap holding a pole
    // spans every longitude
    let angular_radius = radius_km / EARTH_RADIUS_KM;
    let ratio = angular_radius.sin() / lat.to_radians().cos().abs();
    let lon_delta = if ratio < 1.0 {
        ratio.asin().to_degrees() * BOUNDING_BOX_PADDING
    } else {
        f64::INFINITY
    };

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lon >= bbox.min_lon && lon <= bbox.max_lon
}
