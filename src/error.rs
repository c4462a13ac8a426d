//! Error types for the Attendance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report. Messy-but-valid attendance data
//! (unordered events, unmatched clock-ins or clock-outs) is never an error;
//! it is absorbed by the session reconstruction rules instead.

use thiserror::Error;

/// The main error type for the Attendance Engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ContractViolation {
///     field: "user_id".to_string(),
///     message: "field is required".to_string(),
/// };
/// assert_eq!(error.to_string(), "Contract violation on 'user_id': field is required");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No perimeter policy is registered for the organization.
    #[error("Organization not found: {organization_id}")]
    OrganizationNotFound {
        /// The organization identifier that was looked up.
        organization_id: String,
    },

    /// A required field was absent or malformed on an event or policy.
    #[error("Contract violation on '{field}': {message}")]
    ContractViolation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A clock-in was attempted from outside the organization's perimeter.
    #[error(
        "Clock-in rejected: outside allowed perimeter ({distance_meters:.0} m from site, radius {radius_meters:.0} m)"
    )]
    OutOfPerimeter {
        /// The organization whose perimeter was checked.
        organization_id: String,
        /// Measured distance from the perimeter center.
        distance_meters: f64,
        /// The configured perimeter radius.
        radius_meters: f64,
    },

    /// A clock-in carried no coordinates while the intake requires them.
    #[error("Clock-in rejected: a location is required to clock in")]
    LocationRequired,
}

impl EngineError {
    /// Shorthand for a [`EngineError::ContractViolation`] on a missing field.
    pub fn missing_field(field: &str) -> Self {
        EngineError::ContractViolation {
            field: field.to_string(),
            message: "field is required".to_string(),
        }
    }

    /// Returns true for business rejections that should be shown to the end
    /// user rather than treated as faults.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::OutOfPerimeter { .. } | EngineError::LocationRequired
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_organization_not_found_displays_id() {
        let error = EngineError::OrganizationNotFound {
            organization_id: "north_wing".to_string(),
        };
        assert_eq!(error.to_string(), "Organization not found: north_wing");
    }

    #[test]
    fn test_missing_field_is_contract_violation() {
        let error = EngineError::missing_field("timestamp");
        assert_eq!(
            error.to_string(),
            "Contract violation on 'timestamp': field is required"
        );
        assert!(!error.is_rejection());
    }

    #[test]
    fn test_out_of_perimeter_mentions_perimeter() {
        let error = EngineError::OutOfPerimeter {
            organization_id: "default".to_string(),
            distance_meters: 2226.4,
            radius_meters: 2000.0,
        };
        let message = error.to_string();
        assert!(message.contains("outside allowed perimeter"));
        assert!(message.contains("2226 m"));
        assert!(message.contains("radius 2000 m"));
        assert!(error.is_rejection());
    }

    #[test]
    fn test_location_required_is_rejection() {
        assert!(EngineError::LocationRequired.is_rejection());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_field() -> EngineResult<()> {
            Err(EngineError::missing_field("kind"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_field()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
