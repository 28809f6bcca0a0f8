//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{LeaveApplication, WageCalculation};

use super::request::{LeaveRequest, WageRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/wage", post(wage_handler))
        .route("/leave", post(leave_handler))
        .route("/leave/:employee_id", get(leave_list_handler))
        .with_state(state)
}

/// Handler for POST /wage.
///
/// Resolves the requested period in the configured payroll year and returns
/// the wage calculation with its audit trace.
async fn wage_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing wage request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let employee_id = request.employee_id;
    let result = run_blocking(state, move |state| -> EngineResult<WageCalculation> {
        let config = state.config();
        let range = request.period.resolve(config.payroll_year())?;
        config.calculate_wage(employee_id, &range)
    })
    .await;

    match result {
        Ok(Ok(calculation)) => {
            info!(
                correlation_id = %correlation_id,
                employee_id,
                net_wage = %calculation.breakdown.net_wage().round_dp(2),
                duration_us = start_time.elapsed().as_micros(),
                "Wage calculation completed successfully"
            );
            json_response(StatusCode::OK, &calculation)
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id,
                error = %err,
                "Wage calculation failed"
            );
            error_response(err.into())
        }
        Err(response) => error_response(response),
    }
}

/// Handler for POST /leave.
///
/// Computes the leave amounts and records the application.
async fn leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave application");

    let application: LeaveApplication = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employee_id = application.employee_id;
    let result = run_blocking(state, move |state| {
        state.config().leave_store().save_leave_application(&application)
    })
    .await;

    match result {
        Ok(Ok(saved)) => {
            info!(correlation_id = %correlation_id, employee_id, "Leave application saved");
            json_response(StatusCode::CREATED, &saved)
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id,
                error = %err,
                "Leave application rejected"
            );
            error_response(err.into())
        }
        Err(response) => error_response(response),
    }
}

/// Handler for GET /leave/:employee_id.
async fn leave_list_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<u32>,
) -> Response {
    let result = run_blocking(state, move |state| {
        state.config().leave_store().leaves_for_employee(employee_id)
    })
    .await;

    match result {
        Ok(Ok(leaves)) => json_response(StatusCode::OK, &leaves),
        Ok(Err(err)) => {
            warn!(employee_id, error = %err, "Leave lookup failed");
            error_response(err.into())
        }
        Err(response) => error_response(response),
    }
}

/// Runs file-backed work off the async executor.
async fn run_blocking<T, F>(state: AppState, work: F) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| {
            warn!(error = %e, "Blocking task failed");
            ApiErrorResponse::internal("Request processing was interrupted")
        })
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("did not match") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
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
    error_response(ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    api_error.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, PayrollConfig};
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_state(leave_dir: &TempDir) -> AppState {
        let bundled = ConfigLoader::load("./config").expect("Failed to load config");
        let mut config: PayrollConfig = bundled.config().clone();
        config.data.leave = leave_dir.path().join("leave_balances.csv");
        AppState::new(ConfigLoader::from_config(config, "./config"))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_wage_for_month_returns_200() {
        let dir = TempDir::new().unwrap();
        let router = create_router(create_test_state(&dir));

        let (status, body) = send(
            router,
            post_json("/wage", r#"{"employee_id": 10003, "month": "06"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let result: WageCalculation = serde_json::from_value(body).unwrap();
        assert!(result.used_assumed_hours);
        assert_eq!(
            result.breakdown.gross_wage(),
            Decimal::from_str("96427.80").unwrap()
        );
        assert_eq!(result.breakdown.net_wage(), Decimal::from_str("66011.96").unwrap());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let dir = TempDir::new().unwrap();
        let router = create_router(create_test_state(&dir));

        let (status, body) = send(router, post_json("/wage", "{invalid json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let dir = TempDir::new().unwrap();
        let router = create_router(create_test_state(&dir));

        let (status, body) = send(
            router,
            post_json("/wage", r#"{"employee_id": 99999, "month": "06"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reversed_range_returns_400() {
        let dir = TempDir::new().unwrap();
        let router = create_router(create_test_state(&dir));

        let (status, body) = send(
            router,
            post_json(
                "/wage",
                r#"{"employee_id": 10001, "start_date": "06/10", "end_date": "06/01"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_leave_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);

        let (status, body) = send(
            create_router(state.clone()),
            post_json(
                "/leave",
                r#"{"employee_id": 10002, "leave_type": "Vacation Leave",
                    "start_date": "07/01/2024", "end_date": "07/03/2024"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["vacation_leave_amount"], "4500");

        let (status, body) = send(
            create_router(state),
            Request::builder()
                .uri("/leave/10002")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let leaves: Vec<LeaveApplication> = serde_json::from_value(body).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].reason, "No reason provided");
    }
}
