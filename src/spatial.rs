//! Geodesic distance and coordinate helpers.
//!
//! Two metrics are involved in a radius query. The k-d tree prunes in plain
//! Euclidean degree space, which is cheap but not uniformly scaled to meters;
//! reported distances and the final inclusion filter always use the haversine
//! great-circle formula. [`conservative_degree_radius`] bridges the two: it
//! converts a radius in meters into a degree-space bound that may over-select
//! but never under-selects for valid latitudes.

use geo::{Distance, Haversine, Point};

use crate::error::{Result, VicinityError};

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 110_574.0;

/// Meters spanned by one degree of longitude at the equator.
pub const METERS_PER_DEGREE_LON: f64 = 111_320.0;

/// Fixed slack added to the candidate bound, in degrees.
const DEGREE_SLACK: f64 = 0.01;

/// Great-circle distance between two lon/lat points, in meters.
pub fn haversine_distance(origin: &Point, destination: &Point) -> f64 {
    Haversine.distance(*origin, *destination)
}

/// Euclidean radius in degree space guaranteed to contain every point within
/// `radius_meters` of a query at `latitude`.
///
/// Longitude degrees shrink with latitude, so the bound combines the latitude
/// span with a cos-scaled longitude span. Near the poles the longitude term
/// degenerates to a very large radius, which stays correct (the tree simply
/// prunes nothing) even though it is no longer fast.
pub fn conservative_degree_radius(latitude: f64, radius_meters: f64) -> f64 {
    let lat_span = radius_meters / METERS_PER_DEGREE_LAT;
    let lon_scale = latitude.to_radians().cos().max(1e-6);
    let lon_span = radius_meters / (METERS_PER_DEGREE_LON * lon_scale);
    lat_span.hypot(lon_span) + DEGREE_SLACK
}

/// Rounds a distance in meters to 2 decimal places (centimeters).
pub fn round_distance(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

/// Returns the reason a lat/lon pair is not a valid geographic coordinate.
pub(crate) fn coordinate_issue(latitude: f64, longitude: f64) -> Option<String> {
    if !latitude.is_finite() {
        return Some(format!("latitude must be finite, got: {latitude}"));
    }
    if !longitude.is_finite() {
        return Some(format!("longitude must be finite, got: {longitude}"));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Some(format!("latitude out of range [-90.0, 90.0]: {latitude}"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Some(format!("longitude out of range [-180.0, 180.0]: {longitude}"));
    }
    None
}

/// Validates query parameters before any index work happens.
///
/// # Examples
///
/// ```rust
/// use vicinity::validate_query;
///
/// assert!(validate_query(48.8566, 2.3522, 1000.0).is_ok());
/// assert!(validate_query(95.0, 2.3522, 1000.0).is_err());
/// assert!(validate_query(48.8566, 2.3522, -1.0).is_err());
/// ```
pub fn validate_query(latitude: f64, longitude: f64, radius_meters: f64) -> Result<()> {
    if let Some(reason) = coordinate_issue(latitude, longitude) {
        return Err(VicinityError::InvalidQuery(reason));
    }
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(VicinityError::InvalidQuery(format!(
            "radius must be a non-negative number of meters, got: {radius_meters}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_paris_to_london() {
        let paris = Point::new(2.3522, 48.8566);
        let london = Point::new(-0.1278, 51.5074);
        let distance = haversine_distance(&paris, &london);
        assert!((distance - 343_556.53).abs() < 0.01);
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        let p = Point::new(2.3245488, 48.8319929);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn degree_radius_covers_true_offsets() {
        // A point `radius` meters due north/east of the query must fall inside
        // the Euclidean degree bound.
        for &latitude in &[0.0, 48.83, 60.0, -33.9] {
            for &radius in &[0.0, 100.0, 5_000.0, 100_000.0] {
                let bound = conservative_degree_radius(latitude, radius);
                let lat_offset = radius / METERS_PER_DEGREE_LAT;
                let lon_offset =
                    radius / (METERS_PER_DEGREE_LON * latitude.to_radians().cos().max(1e-6));
                assert!(lat_offset.hypot(lon_offset) <= bound);
            }
        }
    }

    #[test]
    fn round_distance_keeps_two_decimals() {
        assert_eq!(round_distance(82.77085371), 82.77);
        assert_eq!(round_distance(100.004), 100.0);
        assert_eq!(round_distance(0.0), 0.0);
    }

    #[test]
    fn validate_query_rejects_out_of_range() {
        assert!(validate_query(90.1, 0.0, 10.0).is_err());
        assert!(validate_query(-90.1, 0.0, 10.0).is_err());
        assert!(validate_query(0.0, 180.1, 10.0).is_err());
        assert!(validate_query(0.0, -180.1, 10.0).is_err());
        assert!(validate_query(f64::NAN, 0.0, 10.0).is_err());
        assert!(validate_query(0.0, f64::INFINITY, 10.0).is_err());
        assert!(validate_query(0.0, 0.0, -0.1).is_err());
        assert!(validate_query(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn validate_query_accepts_boundaries() {
        assert!(validate_query(90.0, 180.0, 0.0).is_ok());
        assert!(validate_query(-90.0, -180.0, 0.0).is_ok());
    }
}
