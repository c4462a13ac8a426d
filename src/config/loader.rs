//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the attendance
//! configuration from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::FixedOffset;

use crate::calculation::{IntakeRules, LocationWatcher, PolicySource};
use crate::error::{EngineError, EngineResult};
use crate::models::{Coordinate, PerimeterPolicy};

use super::types::{
    AttendanceConfig, MAX_STATS_WINDOW_DAYS, Organization, OrganizationsConfig, Settings,
};

/// Loads and provides access to the attendance configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml        # Reporting timezone, intake rules, tracking thresholds
/// └── organizations.yaml   # Organization perimeters
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let policy = loader.get_policy("default").unwrap();
/// println!("Radius: {} m", policy.radius_meters());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AttendanceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing
    /// - Either file contains invalid YAML
    /// - An organization has a non-positive radius
    /// - The reporting offset is not a valid UTC offset
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings_path = path.join("settings.yaml");
        let settings = Self::load_yaml::<Settings>(&settings_path)?;
        let reporting_offset =
            settings
                .reporting_offset()
                .ok_or_else(|| EngineError::ConfigParseError {
                    path: settings_path.display().to_string(),
                    message: format!(
                        "reporting_utc_offset_minutes {} is not a valid UTC offset",
                        settings.reporting_utc_offset_minutes
                    ),
                })?;

        Self::validate_settings(&settings_path, &settings)?;

        let organizations_path = path.join("organizations.yaml");
        let organizations_config = Self::load_yaml::<OrganizationsConfig>(&organizations_path)?;
        let organizations = Self::build_organizations(&organizations_path, organizations_config)?;

        Ok(Self {
            config: AttendanceConfig::new(settings, reporting_offset, organizations),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AttendanceConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Rejects settings that would make tracking or reporting misbehave.
    fn validate_settings(path: &Path, settings: &Settings) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        let threshold = settings.movement_threshold_meters;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid(format!(
                "movement_threshold_meters {} must be a finite, non-negative distance",
                threshold
            )));
        }
        if settings.stats_window_days == 0 || settings.stats_window_days > MAX_STATS_WINDOW_DAYS {
            return Err(invalid(format!(
                "stats_window_days {} must be between 1 and {}",
                settings.stats_window_days, MAX_STATS_WINDOW_DAYS
            )));
        }
        Ok(())
    }

    /// Validates organization entries into organizations with perimeter policies.
    fn build_organizations(
        path: &Path,
        config: OrganizationsConfig,
    ) -> EngineResult<HashMap<String, Organization>> {
        config
            .organizations
            .into_iter()
            .map(|(id, entry)| {
                let center = Coordinate::new(entry.latitude, entry.longitude);
                let policy = center
                    .validate()
                    .and_then(|_| PerimeterPolicy::new(center, entry.radius_meters))
                    .map_err(|e| EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("organization '{}': {}", id, e),
                    })?;

                let organization = Organization {
                    id: id.clone(),
                    name: entry.name,
                    location_name: entry.location_name,
                    policy,
                };
                Ok((id, organization))
            })
            .collect()
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AttendanceConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    /// Returns the reporting timezone used for per-day statistics.
    pub fn reporting_offset(&self) -> FixedOffset {
        self.config.reporting_offset()
    }

    /// Returns the clock action intake rules.
    pub fn intake_rules(&self) -> IntakeRules {
        self.config.settings().intake_rules()
    }

    /// Gets an organization by its id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let organization = loader.get_organization("default")?;
    /// println!("Organization: {}", organization.name);
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn get_organization(&self, organization_id: &str) -> EngineResult<&Organization> {
        self.config
            .organizations()
            .get(organization_id)
            .ok_or_else(|| EngineError::OrganizationNotFound {
                organization_id: organization_id.to_string(),
            })
    }

    /// Gets the perimeter policy of an organization.
    pub fn get_policy(&self, organization_id: &str) -> EngineResult<PerimeterPolicy> {
        self.get_organization(organization_id).map(|o| o.policy)
    }

    /// Creates a location watcher for an organization's perimeter, using the
    /// configured movement threshold.
    pub fn location_watcher(&self, organization_id: &str) -> EngineResult<LocationWatcher> {
        let policy = self.get_policy(organization_id)?;
        Ok(LocationWatcher::new(
            policy,
            self.settings().movement_threshold_meters,
        ))
    }
}

impl PolicySource for ConfigLoader {
    fn perimeter_policy(&self, organization_id: &str) -> EngineResult<PerimeterPolicy> {
        self.get_policy(organization_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/default"
    }

    /// Writes a throwaway configuration directory under the temp dir.
    fn write_config(name: &str, settings: &str, organizations: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("attendance-engine-config-tests")
            .join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("settings.yaml"), settings).unwrap();
        fs::write(dir.join("organizations.yaml"), organizations).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.settings().stats_window_days, 7);
        assert_eq!(loader.settings().movement_threshold_meters, 2.0);
        assert!(!loader.intake_rules().require_location_for_clock_in);
    }

    #[test]
    fn test_default_organization_policy() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let organization = loader.get_organization("default").unwrap();
        assert_eq!(organization.name, "Healthcare Organization");
        assert_eq!(organization.policy.center(), Coordinate::new(0.0, 0.0));
        assert_eq!(organization.policy.radius_meters(), 2000.0);
    }

    #[test]
    fn test_second_organization_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let policy = loader.get_policy("harbour_view").unwrap();
        assert_eq!(policy.radius_meters(), 150.0);
        assert_eq!(
            loader.get_organization("harbour_view").unwrap().location_name.as_deref(),
            Some("12 Harbour Street, Sydney NSW")
        );
    }

    #[test]
    fn test_reporting_offset_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(
            loader.reporting_offset(),
            FixedOffset::east_opt(10 * 3600).unwrap()
        );
    }

    #[test]
    fn test_unknown_organization_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.get_policy("unknown") {
            Err(EngineError::OrganizationNotFound { organization_id }) => {
                assert_eq!(organization_id, "unknown");
            }
            other => panic!("Expected OrganizationNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_source_impl() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(loader.perimeter_policy("default").is_ok());
        assert!(loader.perimeter_policy("unknown").is_err());
    }

    #[test]
    fn test_location_watcher_uses_configured_threshold() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let mut watcher = loader.location_watcher("default").unwrap();

        assert_eq!(watcher.observe(Coordinate::new(0.0, 0.0)), None);
        // ~1.1 m of jitter stays under the 2 m threshold
        assert_eq!(watcher.observe(Coordinate::new(0.00001, 0.0)), None);
        assert_eq!(watcher.last_position(), Some(Coordinate::new(0.0, 0.0)));

        assert!(loader.location_watcher("unknown").is_err());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_radius_rejected_at_load() {
        let dir = write_config(
            "zero_radius",
            "stats_window_days: 7\n",
            "organizations:\n  clinic:\n    name: Clinic\n    latitude: 1.0\n    longitude: 2.0\n    radius_meters: 0\n",
        );

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("clinic"));
                assert!(message.contains("radius"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_center_rejected_at_load() {
        let dir = write_config(
            "invalid_center",
            "{}\n",
            "organizations:\n  clinic:\n    name: Clinic\n    latitude: 123.0\n    longitude: 2.0\n    radius_meters: 50\n",
        );

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_offset_rejected_at_load() {
        let dir = write_config(
            "invalid_offset",
            "reporting_utc_offset_minutes: 5000\n",
            "organizations: {}\n",
        );

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_stats_window_rejected_at_load() {
        let dir = write_config(
            "oversized_window",
            "stats_window_days: 4000000000\n",
            "organizations: {}\n",
        );

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.contains("settings.yaml"));
                assert!(message.contains("stats_window_days"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_stats_window_rejected_at_load() {
        let dir = write_config("zero_window", "stats_window_days: 0\n", "organizations: {}\n");

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_negative_movement_threshold_rejected_at_load() {
        let dir = write_config(
            "negative_threshold",
            "movement_threshold_meters: -1.5\n",
            "organizations: {}\n",
        );

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("movement_threshold_meters"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_movement_threshold_rejected_at_load() {
        let dir = write_config(
            "infinite_threshold",
            "movement_threshold_meters: .inf\n",
            "organizations: {}\n",
        );

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let dir = write_config("malformed", "stats_window_days: [oops\n", "organizations: {}\n");

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::ConfigParseError { .. })
        ));
    }
}
