//! Core data models for the Statutory Calculation Engine.
//!
//! This module contains the input record, bracket tables and result types
//! shared by every calculator.

mod bracket;
mod calculation_input;
mod calculation_result;

pub use bracket::{BracketTable, TenureBracket};
pub use calculation_input::{CalculationInput, DATE_FORMAT, InputValue, parse_date};
pub use calculation_result::{
    ADVISORY_NOTICE, AuditStep, AuditTrace, AuditWarning, CalculationOutcome, CalculationResult,
    FieldKind, OVER_DEDUCTION, ResultField, field_values,
};
