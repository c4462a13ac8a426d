//! Perimeter policy model.
//!
//! A perimeter policy is the circular geofence an organization registers
//! around its site. Clock-ins are accepted only from inside it.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Coordinate;

/// An organization's geofence: a center point and a radius in meters.
///
/// A `(0, 0)` center is accepted. It is what an organization gets before
/// anyone has set its location, and it is a valid if unusual policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyFields")]
pub struct PerimeterPolicy {
    center: Coordinate,
    radius_meters: f64,
}

#[derive(Deserialize)]
struct PolicyFields {
    center: Coordinate,
    radius_meters: f64,
}

impl TryFrom<PolicyFields> for PerimeterPolicy {
    type Error = EngineError;

    fn try_from(fields: PolicyFields) -> EngineResult<Self> {
        PerimeterPolicy::new(fields.center, fields.radius_meters)
    }
}

impl PerimeterPolicy {
    /// Creates a policy, rejecting a radius that is not strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{Coordinate, PerimeterPolicy};
    ///
    /// let policy = PerimeterPolicy::new(Coordinate::new(0.0, 0.0), 2000.0).unwrap();
    /// assert_eq!(policy.radius_meters(), 2000.0);
    ///
    /// assert!(PerimeterPolicy::new(Coordinate::new(0.0, 0.0), 0.0).is_err());
    /// ```
    pub fn new(center: Coordinate, radius_meters: f64) -> EngineResult<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(EngineError::ContractViolation {
                field: "radius_meters".to_string(),
                message: format!("radius must be a positive number of meters, got {}", radius_meters),
            });
        }
        Ok(Self {
            center,
            radius_meters,
        })
    }

    /// The center of the perimeter.
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// The radius of the perimeter in meters.
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}
