//! Request types for the Statutory Calculation Engine API.

use serde::{Deserialize, Serialize};

use crate::models::CalculationInput;

/// Request body for `POST /calculators/:id/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Named input fields.
    pub input: CalculationInput,
    /// Constants year; defaults to the calculator's reference year.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Request body for `POST /calculators/:id/report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Named input fields.
    pub input: CalculationInput,
    /// Constants year; defaults to the calculator's reference year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Report title; defaults to the calculator title.
    #[serde(default)]
    pub title: Option<String>,
    /// Report category; defaults to the calculator category.
    #[serde(default)]
    pub category: Option<String>,
}
