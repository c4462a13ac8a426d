//! Per-user and organization-wide attendance statistics.
//!
//! These are the figures behind the manager dashboard: hours per staff member
//! over a reporting window, the average worked hours per active day, and how
//! many people are on site.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{ClockEvent, DashboardStats, Session, UserHours};

use super::{clocked_in_user_ids, daily_average_hours, sessions_by_user, total_hours};

/// Default length of the dashboard reporting window in days.
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 7;

/// Completed hours per user over `[window_start, window_end)`.
///
/// Events outside the window are discarded before sessions are rebuilt, so a
/// shift that started before the window contributes nothing (its clock-out
/// becomes an orphan). Every user with at least one event in the window
/// appears in the result, possibly with zero hours.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::weekly_stats_by_user;
/// use attendance_engine::models::{ClockEvent, ClockKind};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let at = |d, h| Utc.with_ymd_and_hms(2026, 1, d, h, 0, 0).unwrap();
/// let events = vec![
///     ClockEvent::new("cw_001", ClockKind::ClockIn, at(13, 8)),
///     ClockEvent::new("cw_001", ClockKind::ClockOut, at(13, 16)),
///     ClockEvent::new("cw_002", ClockKind::ClockIn, at(14, 9)),
/// ];
///
/// let stats = weekly_stats_by_user(&events, at(12, 0), at(19, 0));
/// assert_eq!(stats["cw_001"], Decimal::new(8, 0));
/// assert_eq!(stats["cw_002"], Decimal::ZERO);
/// ```
pub fn weekly_stats_by_user(
    all_events: &[ClockEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> BTreeMap<String, Decimal> {
    sessions_by_user(events_in_window(all_events, window_start, window_end))
        .into_iter()
        .map(|(user_id, sessions)| (user_id, total_hours(&sessions)))
        .collect()
}

/// [`weekly_stats_by_user`] flattened into a list ordered by user id.
pub fn user_hours(
    all_events: &[ClockEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<UserHours> {
    weekly_stats_by_user(all_events, window_start, window_end)
        .into_iter()
        .map(|(user_id, total_hours)| UserHours {
            user_id,
            total_hours,
        })
        .collect()
}

/// Computes the manager dashboard figures as of `now`.
///
/// - `avg_hours_per_day` and `total_hours_this_week` cover events stamped at or
///   after `now - window_days`, with days taken in the reporting timezone `tz`.
/// - `daily_clock_ins` counts clock-ins stamped at or after `now - 24h`.
/// - `clocked_in_count` looks at the whole history.
///
/// Events stamped after `now` are included in the windowed figures; clients
/// with skewed clocks still see their shifts counted. A window reaching past
/// the earliest representable instant starts there instead.
pub fn dashboard_stats<Tz: TimeZone>(
    all_events: &[ClockEvent],
    now: DateTime<Utc>,
    tz: &Tz,
    window_days: u32,
) -> DashboardStats {
    let window_start = now
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let day_start = now
        .checked_sub_signed(Duration::hours(24))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let sessions: Vec<Session> =
        sessions_by_user(events_in_window(all_events, window_start, DateTime::<Utc>::MAX_UTC))
            .into_values()
            .flatten()
            .collect();

    let daily_clock_ins = all_events
        .iter()
        .filter(|e| e.is_clock_in() && e.timestamp >= day_start)
        .count();

    DashboardStats {
        avg_hours_per_day: daily_average_hours(
            &sessions,
            window_start,
            DateTime::<Utc>::MAX_UTC,
            tz,
        ),
        daily_clock_ins,
        total_hours_this_week: total_hours(&sessions),
        clocked_in_count: clocked_in_user_ids(all_events).len(),
    }
}

fn events_in_window(
    events: &[ClockEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> impl Iterator<Item = &ClockEvent> {
    events
        .iter()
        .filter(move |e| e.timestamp >= window_start && e.timestamp < window_end)
}
