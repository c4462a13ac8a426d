//! Hour totals and averages over reconstructed sessions.
//!
//! Only completed sessions carry hours. Open sessions and sessions whose
//! clock-out precedes their clock-in are worth zero, so no aggregate can fall
//! below the sum of the genuine durations.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::Session;

/// Sums the hours of all completed sessions.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::total_hours;
/// use attendance_engine::models::Session;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 1, 15, h, 0, 0).unwrap();
/// let sessions = vec![
///     Session { user_id: "cw_001".into(), clock_in: at(8), clock_out: Some(at(12)) },
///     Session { user_id: "cw_001".into(), clock_in: at(13), clock_out: None },
/// ];
///
/// assert_eq!(total_hours(&sessions), Decimal::new(4, 0));
/// ```
pub fn total_hours(sessions: &[Session]) -> Decimal {
    sessions.iter().map(Session::hours).sum()
}

/// Average hours per completed session, or zero when none is completed.
pub fn average_session_hours(sessions: &[Session]) -> Decimal {
    let completed = sessions.iter().filter(|s| !s.is_open()).count();
    if completed == 0 {
        return Decimal::ZERO;
    }
    total_hours(sessions) / Decimal::from(completed)
}

/// Sums completed-session hours per calendar day of the clock-in.
///
/// Only sessions whose clock-in and clock-out both fall within
/// `[window_start, window_end)` are counted, the same rule
/// [`crate::calculation::weekly_stats_by_user`] applies to events. Days are
/// taken in the reporting timezone `tz`.
pub fn hours_by_day<Tz: TimeZone>(
    sessions: &[Session],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    tz: &Tz,
) -> BTreeMap<NaiveDate, Decimal> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for session in sessions
        .iter()
        .filter(|s| s.clock_in >= window_start && s.clock_in < window_end)
        .filter(|s| s.clock_out.is_some_and(|out| out >= window_start && out < window_end))
    {
        *days.entry(session.clock_in_date(tz)).or_default() += session.hours();
    }
    days
}

/// Average completed hours per active day.
///
/// Hours are grouped by the calendar day of each clock-in (see
/// [`hours_by_day`]) and the total is divided by the number of days that have
/// at least one completed session, not by the length of the window. A week
/// with shifts on two days averages over two.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::daily_average_hours;
/// use attendance_engine::models::Session;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 1, d, h, 0, 0).unwrap();
/// let sessions = vec![
///     Session { user_id: "cw_001".into(), clock_in: at(12, 8), clock_out: Some(at(12, 16)) },
///     Session { user_id: "cw_001".into(), clock_in: at(14, 9), clock_out: Some(at(14, 13)) },
/// ];
///
/// let average = daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc);
/// assert_eq!(average, Decimal::new(6, 0)); // (8 + 4) / 2 active days
/// ```
pub fn daily_average_hours<Tz: TimeZone>(
    sessions: &[Session],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    tz: &Tz,
) -> Decimal {
    let days = hours_by_day(sessions, window_start, window_end, tz);
    if days.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = days.values().copied().sum();
    total / Decimal::from(days.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn session(clock_in: DateTime<Utc>, clock_out: Option<DateTime<Utc>>) -> Session {
        Session {
            user_id: "cw_001".to_string(),
            clock_in,
            clock_out,
        }
    }

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    // ==========================================================================
    // total_hours
    // ==========================================================================
    #[test]
    fn test_total_hours_single_shift() {
        let sessions = vec![session(at(15, 8), Some(at(15, 16)))];
        assert_eq!(total_hours(&sessions), dec(80, 1));
    }

    #[test]
    fn test_total_hours_open_session_contributes_nothing() {
        let sessions = vec![session(at(15, 8), None)];
        assert_eq!(total_hours(&sessions), Decimal::ZERO);
    }

    #[test]
    fn test_total_hours_reversed_session_clamped() {
        let sessions = vec![
            session(at(15, 8), Some(at(15, 16))),
            session(at(16, 16), Some(at(16, 8))),
        ];
        assert_eq!(total_hours(&sessions), dec(8, 0));
    }

    #[test]
    fn test_total_hours_empty() {
        assert_eq!(total_hours(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_hours_overnight_shift() {
        let sessions = vec![session(at(15, 22), Some(at(16, 6)))];
        assert_eq!(total_hours(&sessions), dec(8, 0));
    }

    // ==========================================================================
    // average_session_hours
    // ==========================================================================
    #[test]
    fn test_average_session_hours_ignores_open_session() {
        let sessions = vec![
            session(at(12, 8), Some(at(12, 16))),
            session(at(13, 8), Some(at(13, 12))),
            session(at(14, 8), None),
        ];
        assert_eq!(average_session_hours(&sessions), dec(6, 0));
    }

    #[test]
    fn test_average_session_hours_without_completed_sessions() {
        assert_eq!(
            average_session_hours(&[session(at(12, 8), None)]),
            Decimal::ZERO
        );
    }

    // ==========================================================================
    // daily_average_hours
    // ==========================================================================
    #[test]
    fn test_daily_average_divides_by_active_days() {
        let sessions = vec![
            session(at(12, 8), Some(at(12, 16))),
            session(at(15, 8), Some(at(15, 12))),
        ];

        let average = daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc);

        assert_eq!(average, dec(6, 0));
    }

    #[test]
    fn test_daily_average_sums_sessions_on_same_day() {
        let sessions = vec![
            session(at(12, 6), Some(at(12, 10))),
            session(at(12, 14), Some(at(12, 18))),
            session(at(13, 8), Some(at(13, 10))),
        ];

        let days = hours_by_day(&sessions, at(12, 0), at(19, 0), &Utc);
        assert_eq!(days.len(), 2);
        assert_eq!(days[&NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()], dec(8, 0));

        let average = daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc);
        assert_eq!(average, dec(5, 0));
    }

    #[test]
    fn test_daily_average_respects_window() {
        let sessions = vec![
            session(at(5, 8), Some(at(5, 20))),
            session(at(12, 8), Some(at(12, 16))),
            session(at(19, 8), Some(at(19, 18))),
        ];

        // Window end is exclusive
        let average = daily_average_hours(&sessions, at(12, 0), at(19, 8), &Utc);

        assert_eq!(average, dec(8, 0));
    }

    #[test]
    fn test_daily_average_uses_clock_in_day_for_overnight_shift() {
        let sessions = vec![session(at(12, 22), Some(at(13, 6)))];

        let days = hours_by_day(&sessions, at(12, 0), at(19, 0), &Utc);

        assert_eq!(
            days.keys().copied().collect::<Vec<_>>(),
            vec![NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()]
        );
    }

    #[test]
    fn test_daily_average_reporting_timezone_changes_day_grouping() {
        // 20:00 UTC on the 12th and 02:00 UTC on the 13th are both the 13th at UTC+10
        let sessions = vec![
            session(at(12, 20), Some(at(12, 22))),
            session(at(13, 2), Some(at(13, 6))),
        ];
        let sydney = FixedOffset::east_opt(10 * 3600).unwrap();

        assert_eq!(
            daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc),
            dec(3, 0)
        );
        assert_eq!(
            daily_average_hours(&sessions, at(12, 0), at(19, 0), &sydney),
            dec(6, 0)
        );
    }

    #[test]
    fn test_daily_average_ignores_open_sessions() {
        let sessions = vec![
            session(at(12, 8), Some(at(12, 16))),
            session(at(13, 8), None),
        ];

        assert_eq!(
            daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc),
            dec(8, 0)
        );
    }

    #[test]
    fn test_daily_average_with_no_sessions_is_zero() {
        assert_eq!(
            daily_average_hours(&[], at(12, 0), at(19, 0), &Utc),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_hours_by_day_drops_session_ending_after_window() {
        let sessions = vec![
            session(at(12, 8), Some(at(12, 16))),
            session(at(18, 20), Some(at(19, 4))),
        ];

        let days = hours_by_day(&sessions, at(12, 0), at(19, 0), &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(
            daily_average_hours(&sessions, at(12, 0), at(19, 0), &Utc),
            dec(8, 0)
        );
    }
}
