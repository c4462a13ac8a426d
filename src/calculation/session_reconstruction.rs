//! Session reconstruction from raw clock events.
//!
//! Event sources hand over clock events in whatever order they were stored
//! (usually newest first) and the data is messy: devices drop clock-out
//! submissions, people press clock-in twice. The rules here turn any such
//! history into a best-effort sequence of sessions without failing:
//!
//! - events are stably sorted by timestamp, so ties keep their input order;
//! - a clock-in while another is open replaces it (last clock-in wins);
//! - a clock-out with nothing open is an orphan and is dropped;
//! - a clock-in still open at the end becomes an open session.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{ClockEvent, ClockKind, Session};

/// Rebuilds the sessions of one user from an unordered event history.
///
/// Events belonging to other users are ignored. The result is in
/// chronological order and depends only on the set of events, not on the
/// order they were supplied in (as long as no two of the user's events share
/// a timestamp; tied events keep their input order).
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::reconstruct_sessions;
/// use attendance_engine::models::{ClockEvent, ClockKind};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 1, 15, h, 0, 0).unwrap();
///
/// // Newest first, the way history is usually stored
/// let events = vec![
///     ClockEvent::new("cw_001", ClockKind::ClockOut, at(17)),
///     ClockEvent::new("cw_001", ClockKind::ClockIn, at(9)),
///     ClockEvent::new("cw_001", ClockKind::ClockIn, at(8)),
/// ];
///
/// let sessions = reconstruct_sessions(&events, "cw_001");
/// assert_eq!(sessions.len(), 1);
/// assert_eq!(sessions[0].clock_in, at(9)); // the 08:00 clock-in was superseded
/// assert_eq!(sessions[0].clock_out, Some(at(17)));
/// ```
pub fn reconstruct_sessions(events: &[ClockEvent], user_id: &str) -> Vec<Session> {
    let user_events = events.iter().filter(|e| e.user_id == user_id).collect();
    pair_events(user_id, user_events)
}

/// Rebuilds the sessions of every user appearing in `events`, keyed by user id.
pub fn sessions_by_user<'a, I>(events: I) -> BTreeMap<String, Vec<Session>>
where
    I: IntoIterator<Item = &'a ClockEvent>,
{
    let mut grouped: BTreeMap<&str, Vec<&ClockEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.user_id.as_str()).or_default().push(event);
    }

    grouped
        .into_iter()
        .map(|(user_id, user_events)| (user_id.to_string(), pair_events(user_id, user_events)))
        .collect()
}

/// Returns true if the user's most recent event is a clock-in.
///
/// "Most recent" is by timestamp, not by position in the input. When several
/// events share the latest timestamp, the last of them in input order wins,
/// which keeps this in agreement with [`reconstruct_sessions`] ending in an
/// open session.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::is_currently_clocked_in;
/// use attendance_engine::models::{ClockEvent, ClockKind};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2026, 1, 15, h, 0, 0).unwrap();
/// let events = vec![
///     ClockEvent::new("cw_001", ClockKind::ClockIn, at(8)),
///     ClockEvent::new("cw_001", ClockKind::ClockOut, at(16)),
///     ClockEvent::new("cw_001", ClockKind::ClockIn, at(20)),
/// ];
///
/// assert!(is_currently_clocked_in(&events, "cw_001"));
/// assert!(!is_currently_clocked_in(&events, "someone_else"));
/// ```
pub fn is_currently_clocked_in(events: &[ClockEvent], user_id: &str) -> bool {
    events
        .iter()
        .filter(|e| e.user_id == user_id)
        .max_by_key(|e| e.timestamp)
        .is_some_and(ClockEvent::is_clock_in)
}

/// Returns every user whose most recent event is a clock-in.
pub fn clocked_in_user_ids(events: &[ClockEvent]) -> BTreeSet<String> {
    let mut latest: HashMap<&str, &ClockEvent> = HashMap::new();
    for event in events {
        latest
            .entry(event.user_id.as_str())
            .and_modify(|current| {
                // >= so that a later event with the same timestamp wins
                if event.timestamp >= current.timestamp {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    latest
        .into_iter()
        .filter(|(_, event)| event.is_clock_in())
        .map(|(user_id, _)| user_id.to_string())
        .collect()
}

/// Sorts one user's events and pairs clock-ins with clock-outs.
fn pair_events(user_id: &str, mut events: Vec<&ClockEvent>) -> Vec<Session> {
    // sort_by_key is stable, so tied timestamps keep their input order
    events.sort_by_key(|e| e.timestamp);

    let mut sessions = Vec::new();
    let mut open_clock_in: Option<DateTime<Utc>> = None;

    for event in events {
        match event.kind {
            ClockKind::ClockIn => {
                if let Some(superseded) = open_clock_in.replace(event.timestamp) {
                    debug!(
                        user_id = %user_id,
                        superseded = %superseded,
                        clock_in = %event.timestamp,
                        "Repeated clock-in supersedes unmatched clock-in"
                    );
                }
            }
            ClockKind::ClockOut => match open_clock_in.take() {
                Some(clock_in) => sessions.push(Session {
                    user_id: user_id.to_string(),
                    clock_in,
                    clock_out: Some(event.timestamp),
                }),
                None => {
                    debug!(
                        user_id = %user_id,
                        clock_out = %event.timestamp,
                        "Dropping orphan clock-out"
                    );
                }
            },
        }
    }

    if let Some(clock_in) = open_clock_in {
        sessions.push(Session {
            user_id: user_id.to_string(),
            clock_in,
            clock_out: None,
        });
    }

    sessions
}
