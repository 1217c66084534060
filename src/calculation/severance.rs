//! Severance pay (kıdem tazminatı) calculation.
//!
//! Severance is one capped monthly wage per year of tenure. The wage used is
//! limited by the statutory annual ceiling; only the amount above the
//! ceiling is subject to income tax, while stamp duty applies to the full
//! gross amount. An employee who resigns forfeits the entitlement.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{SeveranceConstants, StatutoryConstants};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, CalculationInput, CalculationOutcome, FieldKind, OVER_DEDUCTION,
    ResultField,
};

use super::registry::{FieldDescriptor, StatutoryCalculator};
use super::tenure::{checked_add, checked_mul, round_money, tenure_years};

/// Statute reference for the severance entitlement.
pub const SEVERANCE_LEGAL_REF: &str = "1475 s. İş K. m.14";

/// Statute reference for the income tax exemption up to the ceiling.
pub const SEVERANCE_TAX_LEGAL_REF: &str = "GVK m.25/7";

/// Statute reference for stamp duty on severance.
pub const STAMP_DUTY_LEGAL_REF: &str = "488 s. DVK (1) s. tablo";

const WAGE_FIELD: &str = "last_monthly_gross_wage";

/// Why the employment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The employer ended the contract.
    EmployerTermination,
    /// The employee resigned; no severance is owed.
    Resignation,
    /// The employee retired.
    Retirement,
}

impl TerminationReason {
    /// All accepted tags, in display order.
    pub const TAGS: [&'static str; 3] = ["employer_termination", "resignation", "retirement"];

    /// Returns the snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::EmployerTermination => "employer_termination",
            TerminationReason::Resignation => "resignation",
            TerminationReason::Retirement => "retirement",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminationReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employer_termination" => Ok(TerminationReason::EmployerTermination),
            "resignation" => Ok(TerminationReason::Resignation),
            "retirement" => Ok(TerminationReason::Retirement),
            other => Err(format!(
                "'{}' is not one of {}",
                other,
                Self::TAGS.join(", ")
            )),
        }
    }
}

/// Input for a severance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceInput {
    /// First day of employment.
    pub start_date: NaiveDate,
    /// Last day of employment.
    pub end_date: NaiveDate,
    /// Last gross monthly wage.
    pub last_monthly_gross_wage: Decimal,
    /// Why the employment ended.
    pub termination_reason: TerminationReason,
}

impl SeveranceInput {
    /// Reads and validates the typed input from a flat input record.
    pub fn from_input(input: &CalculationInput) -> EngineResult<Self> {
        let parsed = Self {
            start_date: input.date("start_date")?,
            end_date: input.date("end_date")?,
            last_monthly_gross_wage: input.decimal("last_monthly_gross_wage")?,
            termination_reason: input.tag("termination_reason")?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks the wage is non-negative and the dates are ordered.
    pub fn validate(&self) -> EngineResult<()> {
        if self.last_monthly_gross_wage.is_sign_negative() && !self.last_monthly_gross_wage.is_zero()
        {
            return Err(EngineError::invalid_input(
                "last_monthly_gross_wage",
                "must not be negative",
            ));
        }
        if self.end_date < self.start_date {
            return Err(EngineError::invalid_date(
                "end_date",
                format!("{} precedes start_date {}", self.end_date, self.start_date),
            ));
        }
        Ok(())
    }
}

/// The result of a severance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceResult {
    /// Tenure in fractional years.
    pub tenure_years: Decimal,
    /// The ceiling that was applied.
    pub annual_ceiling: Decimal,
    /// Capped wage times tenure.
    pub gross_severance: Decimal,
    /// Portion of the gross above the tax-exempt ceiling.
    pub taxable_base: Decimal,
    /// Income tax on the taxable base.
    pub income_tax: Decimal,
    /// Stamp duty on the full gross.
    pub stamp_duty: Decimal,
    /// Gross minus deductions, never negative.
    pub net_severance: Decimal,
    /// Rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Non-fatal conditions such as over-deduction.
    pub warnings: Vec<AuditWarning>,
}

impl SeveranceResult {
    /// Returns the named outputs in display order.
    pub fn fields(&self) -> Vec<ResultField> {
        vec![
            ResultField::new("tenure_years", self.tenure_years, FieldKind::Years),
            ResultField::money("annual_ceiling", self.annual_ceiling),
            ResultField::money("gross_severance", self.gross_severance),
            ResultField::money("taxable_base", self.taxable_base),
            ResultField::money("income_tax", self.income_tax),
            ResultField::money("stamp_duty", self.stamp_duty),
            ResultField::money("net_severance", self.net_severance),
        ]
    }
}

impl From<SeveranceResult> for CalculationOutcome {
    fn from(result: SeveranceResult) -> Self {
        CalculationOutcome {
            fields: result.fields(),
            audit_steps: result.audit_steps,
            warnings: result.warnings,
        }
    }
}

/// Calculates severance pay.
///
/// # Algorithm
///
/// 1. `tenure = days / 365.25`
/// 2. Resignation forfeits severance: a zero result is returned.
/// 3. `gross = min(wage, ceiling) × tenure`
/// 4. `taxable = max(gross − ceiling × tenure, 0)`
/// 5. `income_tax = taxable × income_tax_rate`
/// 6. `stamp_duty = gross × stamp_duty_rate`
/// 7. `net = gross − income_tax − stamp_duty`, clamped at zero with an
///    [`OVER_DEDUCTION`] warning.
///
/// Monetary amounts are rounded to 2 dp.
///
/// # Examples
///
/// ```
/// use statutory_engine::calculation::{calculate_severance, SeveranceInput, TerminationReason};
/// use statutory_engine::config::SeveranceConstants;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let constants = SeveranceConstants {
///     annual_ceiling: Decimal::from(22000),
///     income_tax_rate: Decimal::from_str("0.15").unwrap(),
///     stamp_duty_rate: Decimal::from_str("0.00759").unwrap(),
/// };
/// let input = SeveranceInput {
///     start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     last_monthly_gross_wage: Decimal::from(20000),
///     termination_reason: TerminationReason::EmployerTermination,
/// };
///
/// let result = calculate_severance(&input, &constants).unwrap();
/// assert_eq!(result.gross_severance, Decimal::from(80000));
/// assert_eq!(result.net_severance, Decimal::from_str("79392.8").unwrap());
/// ```
pub fn calculate_severance(
    input: &SeveranceInput,
    constants: &SeveranceConstants,
) -> EngineResult<SeveranceResult> {
    input.validate()?;

    let mut audit_steps = Vec::new();
    let mut step_number = 1;

    let tenure = tenure_years(input.start_date, input.end_date)?;
    let days = (input.end_date - input.start_date).num_days();
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "severance_tenure".to_string(),
        rule_name: "Tenure".to_string(),
        legal_ref: SEVERANCE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "start_date": input.start_date.to_string(),
            "end_date": input.end_date.to_string()
        }),
        output: serde_json::json!({
            "days": days,
            "tenure_years": tenure.normalize().to_string()
        }),
        reasoning: format!("{} days / 365.25 = {} years", days, tenure.round_dp(4).normalize()),
    });
    step_number += 1;

    let annual_ceiling = constants.annual_ceiling;

    if input.termination_reason == TerminationReason::Resignation {
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "severance_resignation".to_string(),
            rule_name: "Resignation Forfeits Severance".to_string(),
            legal_ref: SEVERANCE_LEGAL_REF.to_string(),
            input: serde_json::json!({
                "termination_reason": input.termination_reason.as_str()
            }),
            output: serde_json::json!({
                "gross_severance": "0",
                "net_severance": "0"
            }),
            reasoning: "Employee resigned - no severance entitlement".to_string(),
        });

        return Ok(SeveranceResult {
            tenure_years: tenure,
            annual_ceiling,
            gross_severance: Decimal::ZERO,
            taxable_base: Decimal::ZERO,
            income_tax: Decimal::ZERO,
            stamp_duty: Decimal::ZERO,
            net_severance: Decimal::ZERO,
            audit_steps,
            warnings: vec![],
        });
    }

    let capped_wage = input.last_monthly_gross_wage.min(annual_ceiling);
    let ceiling_applied = input.last_monthly_gross_wage > annual_ceiling;
    let gross_severance = round_money(checked_mul(WAGE_FIELD, capped_wage, tenure)?);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "severance_gross".to_string(),
        rule_name: "Gross Severance".to_string(),
        legal_ref: SEVERANCE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "last_monthly_gross_wage": input.last_monthly_gross_wage.normalize().to_string(),
            "annual_ceiling": annual_ceiling.normalize().to_string(),
            "tenure_years": tenure.normalize().to_string()
        }),
        output: serde_json::json!({
            "capped_wage": capped_wage.normalize().to_string(),
            "ceiling_applied": ceiling_applied,
            "gross_severance": gross_severance.normalize().to_string()
        }),
        reasoning: if ceiling_applied {
            format!(
                "Wage {} capped at ceiling {}; {} × {} years = {}",
                input.last_monthly_gross_wage.normalize(),
                annual_ceiling.normalize(),
                capped_wage.normalize(),
                tenure.round_dp(4).normalize(),
                gross_severance.normalize()
            )
        } else {
            format!(
                "{} × {} years = {}",
                capped_wage.normalize(),
                tenure.round_dp(4).normalize(),
                gross_severance.normalize()
            )
        },
    });
    step_number += 1;

    let exempt_amount = round_money(checked_mul("end_date", annual_ceiling, tenure)?);
    let taxable_base = (gross_severance - exempt_amount).max(Decimal::ZERO);
    let income_tax = round_money(checked_mul(
        WAGE_FIELD,
        taxable_base,
        constants.income_tax_rate,
    )?);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "severance_income_tax".to_string(),
        rule_name: "Income Tax on Excess".to_string(),
        legal_ref: SEVERANCE_TAX_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_severance": gross_severance.normalize().to_string(),
            "exempt_amount": exempt_amount.normalize().to_string(),
            "income_tax_rate": constants.income_tax_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_base": taxable_base.normalize().to_string(),
            "income_tax": income_tax.normalize().to_string()
        }),
        reasoning: format!(
            "Amounts up to {} are exempt; taxable {} × {} = {}",
            exempt_amount.normalize(),
            taxable_base.normalize(),
            constants.income_tax_rate.normalize(),
            income_tax.normalize()
        ),
    });
    step_number += 1;

    let stamp_duty = round_money(checked_mul(
        WAGE_FIELD,
        gross_severance,
        constants.stamp_duty_rate,
    )?);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "severance_stamp_duty".to_string(),
        rule_name: "Stamp Duty".to_string(),
        legal_ref: STAMP_DUTY_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_severance": gross_severance.normalize().to_string(),
            "stamp_duty_rate": constants.stamp_duty_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "stamp_duty": stamp_duty.normalize().to_string()
        }),
        reasoning: format!(
            "{} × {} = {}",
            gross_severance.normalize(),
            constants.stamp_duty_rate.normalize(),
            stamp_duty.normalize()
        ),
    });
    step_number += 1;

    let deductions = checked_add(WAGE_FIELD, income_tax, stamp_duty)?;
    let mut warnings = Vec::new();
    let net_severance = if deductions > gross_severance {
        warnings.push(AuditWarning {
            code: OVER_DEDUCTION.to_string(),
            message: format!(
                "Deductions {} exceed gross severance {}; net amount clamped to 0",
                deductions.normalize(),
                gross_severance.normalize()
            ),
            severity: "medium".to_string(),
        });
        Decimal::ZERO
    } else {
        gross_severance - deductions
    };
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "severance_net".to_string(),
        rule_name: "Net Severance".to_string(),
        legal_ref: SEVERANCE_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_severance": gross_severance.normalize().to_string(),
            "deductions": deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_severance": net_severance.normalize().to_string(),
            "clamped": !warnings.is_empty()
        }),
        reasoning: format!(
            "{} − {} − {} = {}",
            gross_severance.normalize(),
            income_tax.normalize(),
            stamp_duty.normalize(),
            net_severance.normalize()
        ),
    });

    Ok(SeveranceResult {
        tenure_years: tenure,
        annual_ceiling,
        gross_severance,
        taxable_base,
        income_tax,
        stamp_duty,
        net_severance,
        audit_steps,
        warnings,
    })
}

/// Registry adapter for [`calculate_severance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SeveranceCalculator;

impl StatutoryCalculator for SeveranceCalculator {
    fn id(&self) -> &str {
        "severance"
    }

    fn title(&self) -> &str {
        "Kıdem Tazminatı"
    }

    fn category(&self) -> &str {
        "İş Hukuku"
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::date("start_date"),
            FieldDescriptor::date("end_date"),
            FieldDescriptor::number("last_monthly_gross_wage"),
            FieldDescriptor::choice("termination_reason", &TerminationReason::TAGS),
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
        let input = SeveranceInput::from_input(input)?;
        calculate_severance(&input, &constants.severance).map(Into::into)
    }
}
