//! Configuration loading and management for the Attendance Engine.
//!
//! This module loads engine settings and organization perimeters from YAML
//! files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Organizations: {}", config.config().organizations().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceConfig, MAX_STATS_WINDOW_DAYS, Organization, OrganizationEntry, OrganizationsConfig,
    Settings,
};
