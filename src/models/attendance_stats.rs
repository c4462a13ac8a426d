//! Aggregate attendance statistics shown on the manager dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Completed hours for one person over a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHours {
    /// The person.
    pub user_id: String,
    /// Completed-session hours inside the window.
    pub total_hours: Decimal,
}

/// Headline figures for the manager dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Average completed hours per active day in the trailing window.
    pub avg_hours_per_day: Decimal,
    /// Clock-ins recorded during the trailing 24 hours.
    pub daily_clock_ins: usize,
    /// Completed hours across all staff in the trailing window.
    pub total_hours_this_week: Decimal,
    /// Number of people clocked in right now.
    pub clocked_in_count: usize,
}
