//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use chrono::FixedOffset;
use serde::Deserialize;

use crate::calculation::{DEFAULT_MOVEMENT_THRESHOLD_METERS, DEFAULT_STATS_WINDOW_DAYS, IntakeRules};
use crate::models::PerimeterPolicy;

/// Longest dashboard reporting window accepted from configuration, in days.
pub const MAX_STATS_WINDOW_DAYS: u32 = 36_500;

/// Engine-wide settings from `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Offset from UTC, in minutes, of the timezone used to assign sessions to days.
    #[serde(default)]
    pub reporting_utc_offset_minutes: i32,
    /// Minimum movement between accepted location samples.
    #[serde(default = "default_movement_threshold")]
    pub movement_threshold_meters: f64,
    /// Reject clock-ins that carry no coordinates.
    #[serde(default)]
    pub require_location_for_clock_in: bool,
    /// Length of the dashboard reporting window in days.
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: u32,
}

fn default_movement_threshold() -> f64 {
    DEFAULT_MOVEMENT_THRESHOLD_METERS
}

fn default_stats_window_days() -> u32 {
    DEFAULT_STATS_WINDOW_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reporting_utc_offset_minutes: 0,
            movement_threshold_meters: DEFAULT_MOVEMENT_THRESHOLD_METERS,
            require_location_for_clock_in: false,
            stats_window_days: DEFAULT_STATS_WINDOW_DAYS,
        }
    }
}

impl Settings {
    /// The intake rules these settings describe.
    pub fn intake_rules(&self) -> IntakeRules {
        IntakeRules {
            require_location_for_clock_in: self.require_location_for_clock_in,
        }
    }

    /// The reporting timezone, if the offset is within +/- 24 hours.
    pub fn reporting_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.reporting_utc_offset_minutes.checked_mul(60)?)
    }
}

/// One organization entry in `organizations.yaml`, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationEntry {
    /// Display name.
    pub name: String,
    /// Latitude of the site center.
    pub latitude: f64,
    /// Longitude of the site center.
    pub longitude: f64,
    /// Human-readable site address.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Perimeter radius in meters.
    pub radius_meters: f64,
}

/// Organizations configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationsConfig {
    /// Map of organization id to organization details.
    pub organizations: HashMap<String, OrganizationEntry>,
}

/// A validated organization with its perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    /// Organization identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Human-readable site address.
    pub location_name: Option<String>,
    /// The geofence clock-ins are checked against.
    pub policy: PerimeterPolicy,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    settings: Settings,
    reporting_offset: FixedOffset,
    organizations: HashMap<String, Organization>,
}

impl AttendanceConfig {
    /// Creates a configuration from its validated parts.
    pub fn new(
        settings: Settings,
        reporting_offset: FixedOffset,
        organizations: HashMap<String, Organization>,
    ) -> Self {
        Self {
            settings,
            reporting_offset,
            organizations,
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the reporting timezone.
    pub fn reporting_offset(&self) -> FixedOffset {
        self.reporting_offset
    }

    /// Returns all organizations.
    pub fn organizations(&self) -> &HashMap<String, Organization> {
        &self.organizations
    }
}
