//! HTTP API module for the Attendance Engine.
//!
//! This module provides the REST endpoints for perimeter checks, clock
//! action intake and attendance statistics.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ClockRequest, DashboardRequest, PerimeterCheckRequest, SessionsRequest, WeeklyStatsRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, ClockResponse, PerimeterCheckResponse, SessionsResponse,
    WeeklyStatsResponse,
};
pub use state::AppState;
