//! HTTP request handlers for the Statutory Calculation Engine API.
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
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{CalculationInput, CalculationResult};
use crate::report::CalculationReport;

use super::request::{CalculateRequest, ReportRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/calculators", get(list_calculators_handler))
        .route("/calculators/:id/calculate", post(calculate_handler))
        .route("/calculators/:id/report", post(report_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /calculators.
///
/// Lists every registered calculator with its input fields.
async fn list_calculators_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry().descriptors())
}

/// Handler for POST /calculators/:id/calculate.
///
/// Returns the full [`CalculationResult`] as JSON.
async fn calculate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, calculator = %id, "Processing calculation request");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    match run_calculation(&state, correlation_id, &id, &request.input, request.year) {
        Ok(result) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(result),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handler for POST /calculators/:id/report.
///
/// Runs the calculation and returns its plain-text report.
async fn report_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, calculator = %id, "Processing report request");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    let result = match run_calculation(&state, correlation_id, &id, &request.input, request.year)
    {
        Ok(result) => result,
        Err(error) => return error.into_response(),
    };

    let category = request.category.unwrap_or_else(|| {
        state
            .registry()
            .get(&id)
            .map(|calculator| calculator.category().to_string())
            .unwrap_or_default()
    });
    let title = request.title.unwrap_or_else(|| result.title.clone());
    let report = CalculationReport::new(&result, &title, &category);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.render_text(),
    )
        .into_response()
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_payload<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
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
            warn!(correlation_id = %correlation_id, "Missing JSON content type");
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(ApiErrorResponse::bad_request(error))
}

/// Dispatches to the registry and logs the outcome.
fn run_calculation(
    state: &AppState,
    correlation_id: Uuid,
    id: &str,
    input: &CalculationInput,
    year: Option<i32>,
) -> Result<CalculationResult, ApiErrorResponse> {
    let start_time = Instant::now();

    match state
        .registry()
        .calculate(id, input, year, state.config().config())
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                calculator = %id,
                calculation_id = %result.calculation_id,
                constants_year = result.constants_year,
                warnings = result.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Calculation completed successfully"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                calculator = %id,
                field = err.field().unwrap_or(""),
                error = %err,
                "Calculation failed"
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let config = ConfigLoader::load("./config/tr").expect("Failed to load config");
        create_router(AppState::new(config).expect("Failed to build registry"))
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
    async fn test_health() {
        let response = create_test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = create_test_router()
            .oneshot(post_json("/calculators/notice_pay/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_input_returns_validation_error() {
        let response = create_test_router()
            .oneshot(post_json("/calculators/notice_pay/calculate", r#"{"year": 2024}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculators/notice_pay/calculate")
                    .body(Body::from(r#"{"input": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_report_is_plain_text() {
        let body = r#"{
            "input": {"tenure_years": 2, "daily_gross_wage": 500},
            "year": 2024
        }"#;

        let response = create_test_router()
            .oneshot(post_json("/calculators/notice_pay/report", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("İhbar Tazminatı\nKategori: İş Hukuku\n"));
        assert!(text.contains("İhbar Tazminatı: 14.000 ₺"));
    }
}
