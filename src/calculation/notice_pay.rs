//! Notice pay (ihbar tazminatı) calculation.
//!
//! The notice period grows with tenure in fixed steps; pay in lieu of notice
//! is the daily gross wage for every day of the period.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{NoticeConstants, StatutoryConstants};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, CalculationInput, CalculationOutcome, FieldKind, ResultField};

use super::registry::{FieldDescriptor, StatutoryCalculator};
use super::tenure::{checked_mul, round_money, tenure_years};

/// Statute reference for notice periods.
pub const NOTICE_LEGAL_REF: &str = "4857 s. İş K. m.17";

/// Days per notice week.
const DAYS_PER_WEEK: u32 = 7;

/// Input for a notice pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePayInput {
    /// Tenure in fractional years.
    pub tenure_years: Decimal,
    /// Daily gross wage.
    pub daily_gross_wage: Decimal,
    /// True when notice was served, which satisfies the obligation in kind.
    #[serde(default)]
    pub notice_already_given: bool,
}

impl NoticePayInput {
    /// Reads the typed input from a flat input record.
    ///
    /// Tenure is taken from `tenure_years` when present, otherwise derived
    /// from `start_date` and `end_date`.
    pub fn from_input(input: &CalculationInput) -> EngineResult<Self> {
        let tenure_years = match input.optional_decimal("tenure_years")? {
            Some(tenure) => tenure,
            None if input.contains("start_date") || input.contains("end_date") => {
                tenure_years(input.date("start_date")?, input.date("end_date")?)?
            }
            None => return Err(EngineError::invalid_input("tenure_years", "is required")),
        };

        let parsed = Self {
            tenure_years,
            daily_gross_wage: input.decimal("daily_gross_wage")?,
            notice_already_given: input.flag("notice_already_given")?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks tenure and wage are non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("tenure_years", self.tenure_years),
            ("daily_gross_wage", self.daily_gross_wage),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::invalid_input(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

/// The result of a notice pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePayResult {
    /// Tenure used for the bracket lookup.
    pub tenure_years: Decimal,
    /// Notice period from the bracket table.
    pub notice_weeks: u32,
    /// Notice period in days.
    pub notice_days: u32,
    /// Pay in lieu of notice.
    pub notice_pay: Decimal,
    /// Rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl NoticePayResult {
    /// Returns the named outputs in display order.
    pub fn fields(&self) -> Vec<ResultField> {
        vec![
            ResultField::new("tenure_years", self.tenure_years, FieldKind::Years),
            ResultField::new("notice_weeks", Decimal::from(self.notice_weeks), FieldKind::Count),
            ResultField::new("notice_days", Decimal::from(self.notice_days), FieldKind::Count),
            ResultField::money("notice_pay", self.notice_pay),
        ]
    }
}

impl From<NoticePayResult> for CalculationOutcome {
    fn from(result: NoticePayResult) -> Self {
        CalculationOutcome {
            fields: result.fields(),
            audit_steps: result.audit_steps,
            warnings: vec![],
        }
    }
}

/// Calculates notice pay from the tenure bracket table.
///
/// `notice_pay = daily_gross_wage × notice_weeks × 7`, or zero when notice
/// was already given. The looked-up period is still reported in that case.
///
/// # Examples
///
/// ```
/// use statutory_engine::calculation::{calculate_notice_pay, NoticePayInput};
/// use statutory_engine::config::NoticeConstants;
/// use statutory_engine::models::{BracketTable, TenureBracket};
/// use rust_decimal::Decimal;
///
/// let constants = NoticeConstants {
///     weeks: BracketTable::new(
///         "notice_weeks",
///         vec![
///             TenureBracket { min: Decimal::ZERO, max: Some(Decimal::ONE), value: 2 },
///             TenureBracket { min: Decimal::ONE, max: None, value: 4 },
///         ],
///     )
///     .unwrap(),
/// };
/// let input = NoticePayInput {
///     tenure_years: Decimal::from(2),
///     daily_gross_wage: Decimal::from(500),
///     notice_already_given: false,
/// };
///
/// let result = calculate_notice_pay(&input, &constants).unwrap();
/// assert_eq!(result.notice_weeks, 4);
/// assert_eq!(result.notice_pay, Decimal::from(14000));
/// ```
pub fn calculate_notice_pay(
    input: &NoticePayInput,
    constants: &NoticeConstants,
) -> EngineResult<NoticePayResult> {
    input.validate()?;

    let mut audit_steps = Vec::new();

    let bracket = constants
        .weeks
        .lookup(input.tenure_years)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no notice bracket covers tenure {}", input.tenure_years),
        })?;
    let notice_weeks = bracket.value;
    let notice_days = notice_weeks * DAYS_PER_WEEK;

    audit_steps.push(AuditStep {
        step_number: 1,
        rule_id: "notice_period_lookup".to_string(),
        rule_name: "Notice Period Lookup".to_string(),
        legal_ref: NOTICE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "tenure_years": input.tenure_years.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket_min": bracket.min.normalize().to_string(),
            "bracket_max": bracket.max.map(|max| max.normalize().to_string()),
            "notice_weeks": notice_weeks,
            "notice_days": notice_days
        }),
        reasoning: match bracket.max {
            Some(max) => format!(
                "Tenure {} years falls in [{}, {}) - {} weeks notice",
                input.tenure_years.round_dp(4).normalize(),
                bracket.min.normalize(),
                max.normalize(),
                notice_weeks
            ),
            None => format!(
                "Tenure {} years is at least {} - {} weeks notice",
                input.tenure_years.round_dp(4).normalize(),
                bracket.min.normalize(),
                notice_weeks
            ),
        },
    });

    let (notice_pay, reasoning) = if input.notice_already_given {
        (
            Decimal::ZERO,
            "Notice already given - obligation satisfied in kind, no pay in lieu".to_string(),
        )
    } else {
        let pay = round_money(checked_mul(
            "daily_gross_wage",
            input.daily_gross_wage,
            Decimal::from(notice_days),
        )?);
        (
            pay,
            format!(
                "{} × {} days = {}",
                input.daily_gross_wage.normalize(),
                notice_days,
                pay.normalize()
            ),
        )
    };

    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: "notice_pay".to_string(),
        rule_name: "Pay in Lieu of Notice".to_string(),
        legal_ref: NOTICE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "daily_gross_wage": input.daily_gross_wage.normalize().to_string(),
            "notice_days": notice_days,
            "notice_already_given": input.notice_already_given
        }),
        output: serde_json::json!({
            "notice_pay": notice_pay.normalize().to_string()
        }),
        reasoning,
    });

    Ok(NoticePayResult {
        tenure_years: input.tenure_years,
        notice_weeks,
        notice_days,
        notice_pay,
        audit_steps,
    })
}

/// Registry adapter for [`calculate_notice_pay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticePayCalculator;

impl StatutoryCalculator for NoticePayCalculator {
    fn id(&self) -> &str {
        "notice_pay"
    }

    fn title(&self) -> &str {
        "İhbar Tazminatı"
    }

    fn category(&self) -> &str {
        "İş Hukuku"
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::number("tenure_years").optional(),
            FieldDescriptor::date("start_date").optional(),
            FieldDescriptor::date("end_date").optional(),
            FieldDescriptor::number("daily_gross_wage"),
            FieldDescriptor::flag("notice_already_given"),
        ]
    }

    fn reference_year(&self, input: &CalculationInput) -> Option<i32> {
        input
            .optional_date("end_date")
            .ok()
            .flatten()
            .map(|date| date.year())
    }

    fn calculate(
        &self,
        input: &CalculationInput,
        constants: &StatutoryConstants,
    ) -> EngineResult<CalculationOutcome> {
        let input = NoticePayInput::from_input(input)?;
        calculate_notice_pay(&input, &constants.notice).map(Into::into)
    }
}
