//! HTTP request handlers for the Attendance Engine API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler is a thin shell around the calculation functions: decode, call,
//! encode, log.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    average_session_hours, check_perimeter, clocked_in_user_ids, dashboard_stats,
    intake_clock_action, is_currently_clocked_in, reconstruct_sessions, total_hours, user_hours,
};
use crate::error::EngineError;
use crate::models::events_from_records;

use super::request::{
    ClockRequest, DashboardRequest, PerimeterCheckRequest, SessionsRequest, WeeklyStatsRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, ClockResponse, PerimeterCheckResponse, SessionsResponse,
    WeeklyStatsResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/perimeter/check", post(check_perimeter_handler))
        .route("/clock", post(clock_handler))
        .route("/attendance/sessions", post(sessions_handler))
        .route("/attendance/weekly", post(weekly_stats_handler))
        .route("/attendance/dashboard", post(dashboard_handler))
        .with_state(state)
}

/// Handler for POST /perimeter/check.
///
/// Reports whether a device position is inside an organization's perimeter.
async fn check_perimeter_handler(
    State(state): State<AppState>,
    payload: Result<Json<PerimeterCheckRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing perimeter check");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let point = request.coordinate();
    let policy = point
        .validate()
        .and_then(|_| state.config().get_policy(&request.organization_id));

    match policy {
        Ok(policy) => {
            let check = check_perimeter(point, &policy);
            info!(
                correlation_id = %correlation_id,
                organization_id = %request.organization_id,
                within_perimeter = check.within_perimeter,
                distance_meters = check.distance_meters,
                "Perimeter check completed"
            );
            json_response(
                StatusCode::OK,
                PerimeterCheckResponse {
                    organization_id: request.organization_id,
                    within_perimeter: check.within_perimeter,
                    distance_meters: check.distance_meters,
                    radius_meters: check.radius_meters,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Perimeter check failed"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /clock.
///
/// Validates a proposed clock-in or clock-out and returns the event to persist.
async fn clock_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock action");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let config = state.config();
    let result = request
        .into_action(Utc::now())
        .and_then(|action| intake_clock_action(action, config, &config.intake_rules()));

    match result {
        Ok(event) => {
            let record_id = Uuid::new_v4();
            info!(
                correlation_id = %correlation_id,
                record_id = %record_id,
                user_id = %event.user_id,
                kind = %event.kind,
                has_location = event.location.is_some(),
                "Clock action accepted"
            );
            json_response(StatusCode::OK, ClockResponse { record_id, event })
        }
        Err(err) if err.is_rejection() => {
            // A business outcome shown to the worker, not a fault
            info!(
                correlation_id = %correlation_id,
                reason = %err,
                "Clock action rejected"
            );
            error_response(err)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Clock action failed"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /attendance/sessions.
///
/// Rebuilds one user's sessions and hour totals from their event history.
async fn sessions_handler(payload: Result<Json<SessionsRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing session reconstruction");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let events = match events_from_records(request.events) {
        Ok(events) => events,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Invalid clock event"
            );
            return error_response(err);
        }
    };

    let sessions = reconstruct_sessions(&events, &request.user_id);
    let body = SessionsResponse {
        total_hours: total_hours(&sessions),
        average_session_hours: average_session_hours(&sessions),
        currently_clocked_in: is_currently_clocked_in(&events, &request.user_id),
        user_id: request.user_id,
        sessions,
    };

    info!(
        correlation_id = %correlation_id,
        user_id = %body.user_id,
        events_count = events.len(),
        sessions_count = body.sessions.len(),
        total_hours = %body.total_hours,
        duration_us = start_time.elapsed().as_micros(),
        "Session reconstruction completed"
    );
    json_response(StatusCode::OK, body)
}

/// Handler for POST /attendance/weekly.
///
/// Computes hours per user over a window and the set of clocked-in users.
async fn weekly_stats_handler(payload: Result<Json<WeeklyStatsRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing weekly statistics");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    if request.window_end <= request.window_start {
        warn!(
            correlation_id = %correlation_id,
            window_start = %request.window_start,
            window_end = %request.window_end,
            "Empty reporting window"
        );
        return error_response(EngineError::ContractViolation {
            field: "window_end".to_string(),
            message: "window_end must be after window_start".to_string(),
        });
    }

    let start_time = Instant::now();
    let events = match events_from_records(request.events) {
        Ok(events) => events,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Invalid clock event"
            );
            return error_response(err);
        }
    };

    let body = WeeklyStatsResponse {
        window_start: request.window_start,
        window_end: request.window_end,
        users: user_hours(&events, request.window_start, request.window_end),
        clocked_in_user_ids: clocked_in_user_ids(&events),
    };

    info!(
        correlation_id = %correlation_id,
        events_count = events.len(),
        users_count = body.users.len(),
        clocked_in_count = body.clocked_in_user_ids.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Weekly statistics completed"
    );
    json_response(StatusCode::OK, body)
}

/// Handler for POST /attendance/dashboard.
///
/// Computes the manager dashboard figures in the configured reporting timezone.
async fn dashboard_handler(
    State(state): State<AppState>,
    payload: Result<Json<DashboardRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing dashboard statistics");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let events = match events_from_records(request.events) {
        Ok(events) => events,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Invalid clock event"
            );
            return error_response(err);
        }
    };

    let config = state.config();
    let now = request.now.unwrap_or_else(Utc::now);
    let stats = dashboard_stats(
        &events,
        now,
        &config.reporting_offset(),
        config.settings().stats_window_days,
    );

    info!(
        correlation_id = %correlation_id,
        events_count = events.len(),
        avg_hours_per_day = %stats.avg_hours_per_day,
        clocked_in_count = stats.clocked_in_count,
        duration_us = start_time.elapsed().as_micros(),
        "Dashboard statistics completed"
    );
    json_response(StatusCode::OK, stats)
}

/// Builds a JSON response with an explicit content type.
fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Converts an engine error into its JSON error response.
fn error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Converts a JSON extraction failure into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Well-formed JSON whose fields are absent or of the wrong shape
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::new("CONTRACT_VIOLATION", body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::{body::Body, http::Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::new(config)
    }

    async fn post_json(uri: &str, body: String) -> (StatusCode, Value) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_perimeter_check_inside() {
        let body = json!({"organization_id": "default", "latitude": 0.0, "longitude": 0.01});

        let (status, result) = post_json("/perimeter/check", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["within_perimeter"], true);
        assert_eq!(result["radius_meters"], 2000.0);
    }

    #[tokio::test]
    async fn test_perimeter_check_unknown_organization_returns_404() {
        let body = json!({"organization_id": "ghost", "latitude": 0.0, "longitude": 0.0});

        let (status, result) = post_json("/perimeter/check", body.to_string()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(result["code"], "ORGANIZATION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_clock_in_outside_perimeter_returns_422() {
        let body = json!({
            "user_id": "cw_001",
            "organization_id": "default",
            "type": "CLOCK_IN",
            "latitude": 0.0,
            "longitude": 0.02
        });

        let (status, result) = post_json("/clock", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(result["code"], "OUTSIDE_PERIMETER");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, result) = post_json("/clock", "{invalid json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_sessions_missing_timestamp_returns_contract_violation() {
        let body = json!({
            "user_id": "cw_001",
            "events": [{"user_id": "cw_001", "type": "CLOCK_IN"}]
        });

        let (status, result) = post_json("/attendance/sessions", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "CONTRACT_VIOLATION");
        assert!(result["message"].as_str().unwrap().contains("timestamp"));
    }

    #[tokio::test]
    async fn test_event_with_unparseable_timestamp_is_contract_violation() {
        let body = json!({
            "user_id": "cw_001",
            "events": [{"user_id": "cw_001", "type": "CLOCK_IN", "timestamp": "garbage"}]
        });

        let (status, result) = post_json("/attendance/sessions", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "CONTRACT_VIOLATION");
    }

    #[tokio::test]
    async fn test_wrong_typed_coordinate_is_contract_violation() {
        let body = json!({"organization_id": "default", "latitude": "north", "longitude": 0.0});

        let (status, result) = post_json("/perimeter/check", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "CONTRACT_VIOLATION");
    }

    #[tokio::test]
    async fn test_weekly_empty_window_rejected() {
        let body = json!({
            "events": [],
            "window_start": "2026-01-19T00:00:00Z",
            "window_end": "2026-01-12T00:00:00Z"
        });

        let (status, result) = post_json("/attendance/weekly", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "CONTRACT_VIOLATION");
    }
}
