//! Clock event model and related types.
//!
//! A [`ClockEvent`] is the only fact the attendance engine stores: a single
//! clock-in or clock-out by one person at one instant. Everything else is
//! derived from a sequence of them.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Coordinate;

/// Maximum length of a clock event note, in characters.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Whether an event starts or ends a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockKind {
    /// The worker started a shift.
    ClockIn,
    /// The worker ended a shift.
    ClockOut,
}

impl std::fmt::Display for ClockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockKind::ClockIn => write!(f, "CLOCK_IN"),
            ClockKind::ClockOut => write!(f, "CLOCK_OUT"),
        }
    }
}

/// An immutable clock-in or clock-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockEvent {
    /// The person who clocked.
    pub user_id: String,
    /// The organization whose site the event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Clock-in or clock-out.
    pub kind: ClockKind,
    /// When the event happened (second precision).
    pub timestamp: DateTime<Utc>,
    /// Device position, when geolocation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Optional annotation from the worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ClockEvent {
    /// Creates an event with no organization, location or note.
    ///
    /// The timestamp is truncated to whole seconds.
    pub fn new(user_id: impl Into<String>, kind: ClockKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            organization_id: None,
            kind,
            timestamp: timestamp.trunc_subsecs(0),
            location: None,
            note: None,
        }
    }

    /// Returns true for a clock-in.
    pub fn is_clock_in(&self) -> bool {
        self.kind == ClockKind::ClockIn
    }
}

/// A clock event as delivered by an event source, before validation.
///
/// Every field is optional so that a record missing a required field reaches
/// the engine and is reported as a contract violation instead of failing
/// somewhere inside a decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockEventRecord {
    /// The person who clocked.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The organization whose site the event belongs to.
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Clock-in or clock-out.
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: Option<ClockKind>,
    /// When the event happened.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Latitude of the device, if known.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the device, if known.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Optional annotation from the worker.
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<ClockEventRecord> for ClockEvent {
    type Error = EngineError;

    fn try_from(record: ClockEventRecord) -> EngineResult<Self> {
        let user_id = record
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| EngineError::missing_field("user_id"))?;
        let kind = record.kind.ok_or_else(|| EngineError::missing_field("kind"))?;
        let timestamp = record
            .timestamp
            .ok_or_else(|| EngineError::missing_field("timestamp"))?;

        let location = match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            (None, None) => None,
            (Some(_), None) => return Err(EngineError::missing_field("longitude")),
            (None, Some(_)) => return Err(EngineError::missing_field("latitude")),
        };

        if let Some(note) = &record.note {
            validate_note(note)?;
        }

        Ok(ClockEvent {
            user_id,
            organization_id: record.organization_id,
            kind,
            timestamp: timestamp.trunc_subsecs(0),
            location,
            note: record.note,
        })
    }
}

/// Converts a batch of raw records, failing on the first contract violation.
pub fn events_from_records(records: Vec<ClockEventRecord>) -> EngineResult<Vec<ClockEvent>> {
    records.into_iter().map(ClockEvent::try_from).collect()
}

/// Checks the note length limit.
pub fn validate_note(note: &str) -> EngineResult<()> {
    let length = note.chars().count();
    if length > MAX_NOTE_LENGTH {
        return Err(EngineError::ContractViolation {
            field: "note".to_string(),
            message: format!(
                "note is {} characters, maximum is {}",
                length, MAX_NOTE_LENGTH
            ),
        });
    }
    Ok(())
}
