//! Calculation logic for the Attendance Engine.
//!
//! This module contains the geofence and attendance computations: great-circle
//! distance, perimeter membership, clock action intake, session reconstruction
//! from clock events, hour totals and daily averages, per-user weekly and
//! dashboard statistics, and continuous location tracking.
//!
//! Every function here is pure over its inputs and safe to call from any
//! number of request handlers at once.

mod clock_intake;
mod geo_distance;
mod hours;
mod location_watch;
mod perimeter;
mod session_reconstruction;
mod weekly_stats;

pub use clock_intake::{
    ClockAction, IntakeRules, PolicySource, intake_clock_action, validate_clock_action,
};
pub use geo_distance::{EARTH_RADIUS_METERS, distance_meters};
pub use hours::{average_session_hours, daily_average_hours, hours_by_day, total_hours};
pub use location_watch::{
    DEFAULT_MOVEMENT_THRESHOLD_METERS, LocationWatcher, PerimeterTransition, Reminder,
    reminder_for,
};
pub use perimeter::{PerimeterCheck, check_perimeter, is_within_perimeter};
pub use session_reconstruction::{
    clocked_in_user_ids, is_currently_clocked_in, reconstruct_sessions, sessions_by_user,
};
pub use weekly_stats::{
    DEFAULT_STATS_WINDOW_DAYS, dashboard_stats, user_hours, weekly_stats_by_user,
};
