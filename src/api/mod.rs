//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for wage calculation and leave
//! applications.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{LeaveRequest, PeriodRequest, WageRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
