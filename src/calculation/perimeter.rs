//! Perimeter membership checks.
//!
//! Decides whether a location reading lies inside an organization's geofence
//! and reports the measured distance for display.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, PerimeterPolicy};

use super::distance_meters;

/// The outcome of checking one point against a perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerimeterCheck {
    /// Whether the point is inside the perimeter (boundary inclusive).
    pub within_perimeter: bool,
    /// Distance from the perimeter center in meters.
    pub distance_meters: f64,
    /// The perimeter radius in meters.
    pub radius_meters: f64,
}

/// Returns true if `point` lies inside the perimeter or exactly on its edge.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::is_within_perimeter;
/// use attendance_engine::models::{Coordinate, PerimeterPolicy};
///
/// let policy = PerimeterPolicy::new(Coordinate::new(0.0, 0.0), 2000.0).unwrap();
///
/// assert!(is_within_perimeter(Coordinate::new(0.0, 0.01), &policy)); // ~1112 m
/// assert!(!is_within_perimeter(Coordinate::new(0.0, 0.02), &policy)); // ~2224 m
/// ```
pub fn is_within_perimeter(point: Coordinate, policy: &PerimeterPolicy) -> bool {
    check_perimeter(point, policy).within_perimeter
}

/// Measures `point` against the perimeter and reports the distance with the verdict.
pub fn check_perimeter(point: Coordinate, policy: &PerimeterPolicy) -> PerimeterCheck {
    let distance = distance_meters(point, policy.center());
    PerimeterCheck {
        within_perimeter: distance <= policy.radius_meters(),
        distance_meters: distance,
        radius_meters: policy.radius_meters(),
    }
}
