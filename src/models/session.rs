//! Session model.
//!
//! Sessions are derived from clock events and never stored. The only way to
//! obtain them is [`crate::calculation::reconstruct_sessions`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Seconds in an hour, for converting durations to decimal hours.
const SECONDS_PER_HOUR: i64 = 3600;

/// One reconstructed shift: a clock-in and, once it happened, its clock-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The person the session belongs to.
    pub user_id: String,
    /// When the shift started.
    pub clock_in: DateTime<Utc>,
    /// When the shift ended, or `None` while the person is still clocked in.
    pub clock_out: Option<DateTime<Utc>>,
}

impl Session {
    /// Returns true if the session has no clock-out yet.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Worked hours for a completed session.
    ///
    /// Open sessions are worth zero hours. A clock-out recorded before its
    /// clock-in is also worth zero rather than a negative amount.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Session;
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let session = Session {
    ///     user_id: "cw_001".to_string(),
    ///     clock_in: Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap(),
    ///     clock_out: Some(Utc.with_ymd_and_hms(2026, 1, 15, 16, 30, 0).unwrap()),
    /// };
    /// assert_eq!(session.hours(), Decimal::new(85, 1)); // 8.5
    /// ```
    pub fn hours(&self) -> Decimal {
        match self.clock_out {
            Some(clock_out) => {
                let seconds = (clock_out - self.clock_in).num_seconds().max(0);
                Decimal::new(seconds, 0) / Decimal::new(SECONDS_PER_HOUR, 0)
            }
            None => Decimal::ZERO,
        }
    }

    /// The calendar day of the clock-in in the given reporting timezone.
    pub fn clock_in_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.clock_in.with_timezone(tz).date_naive()
    }
}
