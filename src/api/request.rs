//! Request types for the Attendance Engine API.
//!
//! Event histories arrive as [`ClockEventRecord`]s so that missing required
//! fields are reported by the engine as contract violations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::ClockAction;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClockEventRecord, ClockKind, Coordinate};

/// Request body for the `/perimeter/check` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterCheckRequest {
    /// The organization whose perimeter to check against.
    pub organization_id: String,
    /// Latitude of the device.
    pub latitude: f64,
    /// Longitude of the device.
    pub longitude: f64,
}

impl PerimeterCheckRequest {
    /// The device position.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Request body for the `/clock` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The person clocking.
    pub user_id: String,
    /// The organization whose site they are clocking at.
    pub organization_id: String,
    /// Clock-in or clock-out.
    #[serde(rename = "type", alias = "kind")]
    pub kind: ClockKind,
    /// Latitude of the device, if geolocation succeeded.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the device, if geolocation succeeded.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Optional annotation.
    #[serde(default)]
    pub note: Option<String>,
    /// When the action happened; defaults to the time the request is handled.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ClockRequest {
    /// Converts the request into a clock action, stamping it with `now` if
    /// the client sent no timestamp.
    pub fn into_action(self, now: DateTime<Utc>) -> EngineResult<ClockAction> {
        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            (None, None) => None,
            (Some(_), None) => return Err(EngineError::missing_field("longitude")),
            (None, Some(_)) => return Err(EngineError::missing_field("latitude")),
        };

        Ok(ClockAction {
            user_id: self.user_id,
            organization_id: self.organization_id,
            kind: self.kind,
            timestamp: self.timestamp.unwrap_or(now),
            location,
            note: self.note,
        })
    }
}

/// Request body for the `/attendance/sessions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsRequest {
    /// The person whose history to reconstruct.
    pub user_id: String,
    /// Clock events in any order; other users' events are ignored.
    #[serde(default)]
    pub events: Vec<ClockEventRecord>,
}

/// Request body for the `/attendance/weekly` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStatsRequest {
    /// Clock events of all users, in any order.
    #[serde(default)]
    pub events: Vec<ClockEventRecord>,
    /// Start of the reporting window (inclusive).
    pub window_start: DateTime<Utc>,
    /// End of the reporting window (exclusive).
    pub window_end: DateTime<Utc>,
}

/// Request body for the `/attendance/dashboard` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Clock events of all users, in any order.
    #[serde(default)]
    pub events: Vec<ClockEventRecord>,
    /// The instant to report as of; defaults to the time the request is handled.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}
