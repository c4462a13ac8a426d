//! Geographic coordinate type.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, valid range [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, valid range [-180, 180].
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both components are finite and inside the WGS84 ranges.
    ///
    /// Distance computations never call this; it is meant for input layers
    /// that accept coordinates from devices or forms.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Coordinate;
    ///
    /// assert!(Coordinate::new(-33.87, 151.21).validate().is_ok());
    /// assert!(Coordinate::new(91.0, 0.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EngineError::ContractViolation {
                field: "latitude".to_string(),
                message: format!("{} is outside [-90, 90]", self.latitude),
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EngineError::ContractViolation {
                field: "longitude".to_string(),
                message: format!("{} is outside [-180, 180]", self.longitude),
            });
        }
        Ok(())
    }
}
