//! Response types for the Statutory Calculation Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error, such as the offending field.
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

    /// Creates a calculator not found error response.
    pub fn calculator_not_found(id: &str) -> Self {
        Self::with_details(
            "CALCULATOR_NOT_FOUND",
            format!("Calculator not found: {}", id),
            "GET /calculators lists the available calculators",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidInput { field, .. } => {
                Self::bad_request(ApiError::with_details("INVALID_INPUT", message, field))
            }
            EngineError::InvalidDateRange { field, .. } => {
                Self::bad_request(ApiError::with_details("INVALID_DATE_RANGE", message, field))
            }
            EngineError::InvalidAmount { .. } => {
                Self::bad_request(ApiError::new("INVALID_AMOUNT", message))
            }
            EngineError::ConstantsNotFound { year } => Self::bad_request(ApiError::with_details(
                "CONSTANTS_NOT_FOUND",
                message,
                format!("No statutory constants apply to {} or any earlier year", year),
            )),
            EngineError::CalculatorNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::calculator_not_found(&id),
            },
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidBracketTable { .. }
            | EngineError::BracketTableNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_names_the_field() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_input("daily_gross_wage", "must not be negative").into();

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_INPUT");
        assert_eq!(api_error.error.details.as_deref(), Some("daily_gross_wage"));
        assert!(api_error.error.message.contains("must not be negative"));
    }

    #[test]
    fn test_invalid_date_range_is_bad_request() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_date("end_date", "precedes start_date").into();

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_DATE_RANGE");
        assert_eq!(api_error.error.details.as_deref(), Some("end_date"));
    }

    #[test]
    fn test_calculator_not_found_is_404() {
        let api_error: ApiErrorResponse = EngineError::CalculatorNotFound {
            id: "lottery".to_string(),
        }
        .into();

        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "CALCULATOR_NOT_FOUND");
        assert!(api_error.error.message.contains("lottery"));
    }

    #[test]
    fn test_config_errors_are_500() {
        let api_error: ApiErrorResponse = EngineError::BracketTableNotFound {
            calculator: "court_costs".to_string(),
            year: 2024,
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }

    #[test]
    fn test_calculation_error_is_500() {
        let api_error: ApiErrorResponse = EngineError::CalculationError {
            message: "no bracket".to_string(),
        }
        .into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.details.as_deref(), Some("no bracket"));
    }
}
