//! Great-circle distance between two coordinates.
//!
//! Uses the haversine formula on a spherical Earth. Deployments sit far from
//! the poles and the antimeridian, where the spherical model and the naive
//! longitude difference are both accurate to well under a meter at
//! perimeter scales.

use crate::models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Returns the great-circle distance between two coordinates in meters.
///
/// Inputs are decimal degrees and are not range-checked; see
/// [`Coordinate::validate`] for input layers. The result is non-negative,
/// symmetric in its arguments and exactly zero when `a == b`.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::distance_meters;
/// use attendance_engine::models::Coordinate;
///
/// let site = Coordinate::new(0.0, 0.0);
/// let nearby = Coordinate::new(0.0, 0.01);
///
/// let d = distance_meters(site, nearby);
/// assert!((d - 1111.95).abs() < 0.01);
/// assert_eq!(distance_meters(site, site), 0.0);
/// ```
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push the chord a hair past 1 for near-antipodal points.
    let half_chord = half_chord.clamp(0.0, 1.0);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_METERS * angle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} +/- {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_identical_points_are_zero() {
        let point = Coordinate::new(-37.8136, 144.9631);
        assert_eq!(distance_meters(point, point), 0.0);
    }

    #[test]
    fn test_hundredth_degree_of_longitude_at_equator() {
        let d = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01));
        approx_eq(d, 1111.95, 0.01);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_meters(Coordinate::new(10.0, 20.0), Coordinate::new(11.0, 20.0));
        approx_eq(d, 111_194.93, 0.01);
    }

    #[test]
    fn test_symmetry() {
        let sydney = Coordinate::new(-33.8688, 151.2093);
        let melbourne = Coordinate::new(-37.8136, 144.9631);
        assert_eq!(
            distance_meters(sydney, melbourne),
            distance_meters(melbourne, sydney)
        );
    }

    #[test]
    fn test_sydney_to_melbourne() {
        let sydney = Coordinate::new(-33.8688, 151.2093);
        let melbourne = Coordinate::new(-37.8136, 144.9631);
        // Roughly 713 km on the spherical model
        approx_eq(distance_meters(sydney, melbourne), 713_400.0, 1_000.0);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let d = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(d.is_finite());
        approx_eq(d, std::f64::consts::PI * EARTH_RADIUS_METERS, 1.0);
    }

    #[test]
    fn test_two_meter_movement_is_measurable() {
        // About 2.2 m north
        let a = Coordinate::new(-33.868800, 151.209300);
        let b = Coordinate::new(-33.868780, 151.209300);
        approx_eq(distance_meters(a, b), 2.22, 0.01);
    }
}
