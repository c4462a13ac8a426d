//! Attendance Engine for clock-in/clock-out tracking
//!
//! This crate provides the geofence and attendance ledger for healthcare
//! staff: deciding whether a device position is inside an organization's
//! perimeter, validating clock actions against that perimeter, and turning a
//! history of clock events into sessions, hour totals and dashboard figures.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
