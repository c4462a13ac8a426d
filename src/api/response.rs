//! Response types for the Attendance Engine API.
//!
//! This module defines the response bodies, the error response structure and
//! the mapping from engine errors to HTTP status codes.

use std::collections::BTreeSet;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{ClockEvent, Session, UserHours};

/// Response body for `/perimeter/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterCheckResponse {
    /// The organization checked against.
    pub organization_id: String,
    /// Whether the point is inside the perimeter.
    pub within_perimeter: bool,
    /// Distance from the perimeter center in meters.
    pub distance_meters: f64,
    /// The perimeter radius in meters.
    pub radius_meters: f64,
}

/// Response body for an accepted `/clock` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockResponse {
    /// Identifier to persist the event under.
    pub record_id: Uuid,
    /// The validated event.
    #[serde(flatten)]
    pub event: ClockEvent,
}

/// Response body for `/attendance/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionsResponse {
    /// The person the sessions belong to.
    pub user_id: String,
    /// Sessions in chronological order, the last possibly open.
    pub sessions: Vec<Session>,
    /// Completed-session hours.
    pub total_hours: Decimal,
    /// Average hours per completed session.
    pub average_session_hours: Decimal,
    /// Whether the person is clocked in right now.
    pub currently_clocked_in: bool,
}

/// Response body for `/attendance/weekly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStatsResponse {
    /// Start of the reporting window (inclusive).
    pub window_start: DateTime<Utc>,
    /// End of the reporting window (exclusive).
    pub window_end: DateTime<Utc>,
    /// Completed hours per user, ordered by user id.
    pub users: Vec<UserHours>,
    /// Users clocked in according to the full submitted history.
    pub clocked_in_user_ids: BTreeSet<String>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an outside-perimeter rejection.
    pub fn outside_perimeter(distance_meters: f64, radius_meters: f64) -> Self {
        Self::with_details(
            "OUTSIDE_PERIMETER",
            "You are outside the allowed perimeter for clocking in",
            format!(
                "You are {:.0} m from the site; clock-ins are allowed within {:.0} m",
                distance_meters, radius_meters
            ),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::OrganizationNotFound { organization_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "ORGANIZATION_NOT_FOUND",
                    format!("Organization not found: {}", organization_id),
                    "No perimeter is registered for this organization",
                ),
            },
            EngineError::ContractViolation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "CONTRACT_VIOLATION",
                    format!("Invalid field '{}': {}", field, message),
                    "The request contains an event or location that breaks the input contract",
                ),
            },
            EngineError::OutOfPerimeter {
                distance_meters,
                radius_meters,
                ..
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::outside_perimeter(distance_meters, radius_meters),
            },
            EngineError::LocationRequired => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "LOCATION_REQUIRED",
                    "A location is required to clock in",
                    "Enable location services on your device and try again",
                ),
            },
        }
    }
}
