//! Calculation result models for the Statutory Calculation Engine.
//!
//! This module contains the [`CalculationResult`] envelope and its associated
//! structures: the flat list of named result fields that the presentation
//! layer and report generator render, and the audit trace recording every
//! rule applied along the way.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Disclaimer every statutory result carries when displayed.
pub const ADVISORY_NOTICE: &str =
    "Bu hesaplama bilgilendirme amaçlıdır ve hukuki bağlayıcılığı yoktur.";

/// Warning code raised when deductions would exceed the gross amount.
pub const OVER_DEDUCTION: &str = "OVER_DEDUCTION";

/// How a result field should be rendered.
///
/// # Example
///
/// ```
/// use statutory_engine::models::FieldKind;
///
/// assert_eq!(serde_json::to_string(&FieldKind::Money).unwrap(), "\"money\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A currency amount.
    Money,
    /// A fraction such as a tax rate (0.15 = 15%).
    Rate,
    /// A duration in (possibly fractional) years.
    Years,
    /// A whole count: weeks, days, children.
    Count,
    /// Any other number.
    Number,
}

/// A single named output of a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultField {
    /// The field name, e.g. `net_severance`.
    pub name: String,
    /// The field value.
    pub value: Decimal,
    /// How the value should be rendered.
    pub kind: FieldKind,
}

impl ResultField {
    /// Creates a currency field.
    pub fn money(name: &str, value: Decimal) -> Self {
        Self::new(name, value, FieldKind::Money)
    }

    /// Creates a field of the given kind.
    pub fn new(name: &str, value: Decimal, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            value,
            kind,
        }
    }
}

/// Flattens ordered result fields into a name → value map.
pub fn field_values(fields: &[ResultField]) -> BTreeMap<String, Decimal> {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.value))
        .collect()
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute article behind this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation but must be
/// surfaced to the caller, such as [`OVER_DEDUCTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use statutory_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// What a calculator hands back to the registry before it is wrapped in a
/// [`CalculationResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationOutcome {
    /// Ordered named outputs.
    pub fields: Vec<ResultField>,
    /// Rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Non-fatal conditions.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a statutory calculation.
///
/// Every field is a plain number so the export step can render it directly.
///
/// # Example
///
/// ```
/// use statutory_engine::models::{
///     field_values, AuditTrace, CalculationResult, ResultField, ADVISORY_NOTICE,
/// };
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let fields = vec![ResultField::money("notice_pay", Decimal::from(14000))];
/// let result = CalculationResult {
///     calculation_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     calculator_id: "notice_pay".to_string(),
///     title: "İhbar Tazminatı".to_string(),
///     constants_year: 2024,
///     values: field_values(&fields),
///     fields,
///     disclaimer: ADVISORY_NOTICE.to_string(),
///     audit_trace: AuditTrace { steps: vec![], warnings: vec![], duration_us: 0 },
/// };
/// assert_eq!(result.field("notice_pay"), Some(Decimal::from(14000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The id of the calculator that produced this result.
    pub calculator_id: String,
    /// The display title of the calculator.
    pub title: String,
    /// The year of the statutory constants that were applied.
    pub constants_year: i32,
    /// Ordered named outputs.
    pub fields: Vec<ResultField>,
    /// The same outputs keyed by name, for export.
    pub values: BTreeMap<String, Decimal>,
    /// Advisory notice to display alongside the figures.
    pub disclaimer: String,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// Returns the value of a named field.
    pub fn field(&self, name: &str) -> Option<Decimal> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value)
    }

    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.audit_trace
            .warnings
            .iter()
            .any(|warning| warning.code == code)
    }
}
