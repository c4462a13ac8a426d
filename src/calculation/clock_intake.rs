//! Validation of proposed clock actions before they are persisted.
//!
//! A clock-in that carries coordinates must come from inside the
//! organization's perimeter. A clock-in without coordinates is accepted
//! unless the intake rules require a location: browsers routinely fail to
//! deliver a position and the product tolerates that. Clock-outs are never
//! checked against the perimeter.

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{ClockEvent, ClockKind, Coordinate, PerimeterPolicy, validate_note};

use super::check_perimeter;

/// Supplies the active perimeter policy of an organization.
pub trait PolicySource {
    /// Returns the policy, or [`EngineError::OrganizationNotFound`].
    fn perimeter_policy(&self, organization_id: &str) -> EngineResult<PerimeterPolicy>;
}

impl PolicySource for HashMap<String, PerimeterPolicy> {
    fn perimeter_policy(&self, organization_id: &str) -> EngineResult<PerimeterPolicy> {
        self.get(organization_id)
            .copied()
            .ok_or_else(|| EngineError::OrganizationNotFound {
                organization_id: organization_id.to_string(),
            })
    }
}

/// Switches that decide how strict the intake is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRules {
    /// Reject clock-ins that carry no coordinates.
    #[serde(default)]
    pub require_location_for_clock_in: bool,
}

/// A clock-in or clock-out someone is trying to record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockAction {
    /// The person clocking.
    pub user_id: String,
    /// The organization whose site they are clocking at.
    pub organization_id: String,
    /// Clock-in or clock-out.
    pub kind: ClockKind,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Device position, if geolocation succeeded.
    pub location: Option<Coordinate>,
    /// Optional annotation.
    pub note: Option<String>,
}

/// Validates an action against an already-fetched policy and builds the event to persist.
///
/// `policy` is `None` when the organization has no registered perimeter, in
/// which case the perimeter check is skipped.
///
/// # Errors
///
/// - [`EngineError::ContractViolation`] for an over-long note or a coordinate
///   outside the WGS84 ranges.
/// - [`EngineError::OutOfPerimeter`] for a clock-in from outside the perimeter.
/// - [`EngineError::LocationRequired`] for a clock-in without coordinates when
///   `rules` demand one.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{validate_clock_action, ClockAction, IntakeRules};
/// use attendance_engine::error::EngineError;
/// use attendance_engine::models::{ClockKind, Coordinate, PerimeterPolicy};
/// use chrono::Utc;
///
/// let policy = PerimeterPolicy::new(Coordinate::new(0.0, 0.0), 2000.0).unwrap();
/// let action = ClockAction {
///     user_id: "cw_001".to_string(),
///     organization_id: "default".to_string(),
///     kind: ClockKind::ClockIn,
///     timestamp: Utc::now(),
///     location: Some(Coordinate::new(0.0, 0.02)),
///     note: None,
/// };
///
/// let result = validate_clock_action(action, Some(&policy), &IntakeRules::default());
/// assert!(matches!(result, Err(EngineError::OutOfPerimeter { .. })));
/// ```
pub fn validate_clock_action(
    action: ClockAction,
    policy: Option<&PerimeterPolicy>,
    rules: &IntakeRules,
) -> EngineResult<ClockEvent> {
    if let Some(note) = &action.note {
        validate_note(note)?;
    }
    if let Some(location) = &action.location {
        location.validate()?;
    }

    if action.kind == ClockKind::ClockIn {
        match (action.location, policy) {
            (Some(point), Some(policy)) => {
                let check = check_perimeter(point, policy);
                if !check.within_perimeter {
                    info!(
                        user_id = %action.user_id,
                        organization_id = %action.organization_id,
                        distance_meters = check.distance_meters,
                        radius_meters = check.radius_meters,
                        "Clock-in outside perimeter"
                    );
                    return Err(EngineError::OutOfPerimeter {
                        organization_id: action.organization_id,
                        distance_meters: check.distance_meters,
                        radius_meters: check.radius_meters,
                    });
                }
            }
            (None, _) if rules.require_location_for_clock_in => {
                info!(
                    user_id = %action.user_id,
                    organization_id = %action.organization_id,
                    "Clock-in without location"
                );
                return Err(EngineError::LocationRequired);
            }
            _ => {}
        }
    }

    Ok(ClockEvent {
        user_id: action.user_id,
        organization_id: Some(action.organization_id),
        kind: action.kind,
        timestamp: action.timestamp.trunc_subsecs(0),
        location: action.location,
        note: action.note,
    })
}

/// Looks up the organization's policy and validates the action against it.
///
/// An unknown organization does not block the action; the perimeter check is
/// skipped and a warning is logged. Any other lookup failure is returned.
pub fn intake_clock_action<S>(
    action: ClockAction,
    policies: &S,
    rules: &IntakeRules,
) -> EngineResult<ClockEvent>
where
    S: PolicySource + ?Sized,
{
    let policy = match policies.perimeter_policy(&action.organization_id) {
        Ok(policy) => Some(policy),
        Err(EngineError::OrganizationNotFound { organization_id }) => {
            warn!(
                organization_id = %organization_id,
                "No perimeter policy for organization, skipping perimeter check"
            );
            None
        }
        Err(err) => return Err(err),
    };

    validate_clock_action(action, policy.as_ref(), rules)
}
