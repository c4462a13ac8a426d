//! Core data models for the Attendance Engine.
//!
//! This module contains the domain models used throughout the engine.

mod attendance_stats;
mod clock_event;
mod coordinate;
mod perimeter_policy;
mod session;

pub use attendance_stats::{DashboardStats, UserHours};
pub use clock_event::{
    ClockEvent, ClockEventRecord, ClockKind, MAX_NOTE_LENGTH, events_from_records, validate_note,
};
pub use coordinate::Coordinate;
pub use perimeter_policy::PerimeterPolicy;
pub use session::Session;
