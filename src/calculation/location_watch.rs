//! Continuous location tracking against a perimeter.
//!
//! A [`LocationWatcher`] is fed the stream of position samples a device
//! produces while the worker has the app open. Samples that moved less than
//! the movement threshold since the last accepted one are ignored, so GPS
//! jitter does not trigger repeated perimeter checks. Crossing the perimeter
//! edge produces a [`PerimeterTransition`], which [`reminder_for`] turns into
//! a clock-in or clock-out reminder when one is due.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, PerimeterPolicy};

use super::{distance_meters, is_within_perimeter};

/// Default minimum movement between accepted samples, in meters.
pub const DEFAULT_MOVEMENT_THRESHOLD_METERS: f64 = 2.0;

/// A crossing of the perimeter edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerimeterTransition {
    /// The worker moved from outside to inside.
    Entered,
    /// The worker moved from inside to outside.
    Exited,
}

/// A nudge to show the worker after a perimeter crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reminder {
    /// Arrived on site while clocked out.
    ClockIn,
    /// Left the site while clocked in.
    ClockOut,
}

impl Reminder {
    /// The text shown to the worker.
    pub fn message(&self) -> &'static str {
        match self {
            Reminder::ClockIn => "You have entered the work perimeter. Don't forget to clock in!",
            Reminder::ClockOut => "You have left the work perimeter. Don't forget to clock out!",
        }
    }
}

/// Returns the reminder due after `transition`, if any.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{reminder_for, PerimeterTransition, Reminder};
///
/// assert_eq!(reminder_for(PerimeterTransition::Entered, false), Some(Reminder::ClockIn));
/// assert_eq!(reminder_for(PerimeterTransition::Entered, true), None);
/// assert_eq!(reminder_for(PerimeterTransition::Exited, true), Some(Reminder::ClockOut));
/// ```
pub fn reminder_for(transition: PerimeterTransition, currently_clocked_in: bool) -> Option<Reminder> {
    match (transition, currently_clocked_in) {
        (PerimeterTransition::Entered, false) => Some(Reminder::ClockIn),
        (PerimeterTransition::Exited, true) => Some(Reminder::ClockOut),
        _ => None,
    }
}

/// Tracks one device's position relative to one perimeter.
#[derive(Debug, Clone)]
pub struct LocationWatcher {
    policy: PerimeterPolicy,
    movement_threshold_meters: f64,
    last_position: Option<Coordinate>,
    inside: Option<bool>,
}

impl LocationWatcher {
    /// Creates a watcher with no position yet.
    pub fn new(policy: PerimeterPolicy, movement_threshold_meters: f64) -> Self {
        Self {
            policy,
            movement_threshold_meters,
            last_position: None,
            inside: None,
        }
    }

    /// Feeds one position sample.
    ///
    /// Returns a transition when this sample crosses the perimeter edge.
    /// The first accepted sample only establishes whether the device starts
    /// inside or outside and never reports a transition.
    pub fn observe(&mut self, sample: Coordinate) -> Option<PerimeterTransition> {
        if let Some(last) = self.last_position {
            if distance_meters(last, sample) < self.movement_threshold_meters {
                return None;
            }
        }
        self.last_position = Some(sample);

        let inside_now = is_within_perimeter(sample, &self.policy);
        match self.inside.replace(inside_now) {
            Some(false) if inside_now => Some(PerimeterTransition::Entered),
            Some(true) if !inside_now => Some(PerimeterTransition::Exited),
            _ => None,
        }
    }

    /// Whether the last accepted sample was inside the perimeter.
    pub fn is_inside(&self) -> Option<bool> {
        self.inside
    }

    /// The last accepted sample.
    pub fn last_position(&self) -> Option<Coordinate> {
        self.last_position
    }
}
