//! Alimony / support (nafaka) estimation.
//!
//! Child support is a share of the payer's income that grows with the number
//! of children up to a cap; spousal support is a share of the income gap
//! between the parties. The result is an estimate only.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AlimonyConstants, StatutoryConstants};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, CalculationInput, CalculationOutcome, FieldKind, ResultField};

use super::registry::{FieldDescriptor, StatutoryCalculator};
use super::tenure::{checked_add, checked_mul, round_money};

/// Statute reference for support awards.
pub const ALIMONY_LEGAL_REF: &str = "TMK m.175, m.182";

/// Which kinds of support are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    /// Child support only.
    Child,
    /// Spousal support only.
    Spouse,
    /// Child and spousal support.
    Both,
}

impl SupportType {
    /// Accepted input tags.
    pub const TAGS: [&'static str; 3] = ["child", "spouse", "both"];

    /// Returns the input tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportType::Child => "child",
            SupportType::Spouse => "spouse",
            SupportType::Both => "both",
        }
    }

    /// Returns true when child support is part of the request.
    pub fn includes_child(&self) -> bool {
        matches!(self, SupportType::Child | SupportType::Both)
    }

    /// Returns true when spousal support is part of the request.
    pub fn includes_spouse(&self) -> bool {
        matches!(self, SupportType::Spouse | SupportType::Both)
    }
}

impl fmt::Display for SupportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "child" => Ok(SupportType::Child),
            "spouse" => Ok(SupportType::Spouse),
            "both" => Ok(SupportType::Both),
            other => Err(format!(
                "unknown support type '{}', expected one of {}",
                other,
                Self::TAGS.join(", ")
            )),
        }
    }
}

/// Alimony input, keyed by `support_type`.
///
/// Each variant carries only the fields it needs.
///
/// # Example
///
/// ```
/// use statutory_engine::calculation::AlimonyInput;
///
/// let input: AlimonyInput = serde_json::from_str(
///     r#"{"support_type": "child", "payer_monthly_income": "20000", "child_count": 2}"#,
/// )
/// .unwrap();
/// assert!(matches!(input, AlimonyInput::Child { child_count: 2, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "support_type", rename_all = "snake_case")]
pub enum AlimonyInput {
    /// Child support only.
    Child {
        /// Payer's monthly income.
        payer_monthly_income: Decimal,
        /// Number of children, at least one.
        child_count: u32,
    },
    /// Spousal support only.
    Spouse {
        /// Payer's monthly income.
        payer_monthly_income: Decimal,
        /// The other party's monthly income.
        other_party_monthly_income: Decimal,
    },
    /// Child and spousal support.
    Both {
        /// Payer's monthly income.
        payer_monthly_income: Decimal,
        /// Number of children, at least one.
        child_count: u32,
        /// The other party's monthly income.
        other_party_monthly_income: Decimal,
    },
}

impl AlimonyInput {
    /// Reads the variant named by `support_type` from a flat input record.
    ///
    /// Fields the variant does not need are ignored.
    pub fn from_input(input: &CalculationInput) -> EngineResult<Self> {
        let support_type: SupportType = input.tag("support_type")?;
        let payer_monthly_income = input.decimal("payer_monthly_income")?;

        let parsed = match support_type {
            SupportType::Child => AlimonyInput::Child {
                payer_monthly_income,
                child_count: input.count("child_count")?,
            },
            SupportType::Spouse => AlimonyInput::Spouse {
                payer_monthly_income,
                other_party_monthly_income: input.decimal("other_party_monthly_income")?,
            },
            SupportType::Both => AlimonyInput::Both {
                payer_monthly_income,
                child_count: input.count("child_count")?,
                other_party_monthly_income: input.decimal("other_party_monthly_income")?,
            },
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Returns the variant tag.
    pub fn support_type(&self) -> SupportType {
        match self {
            AlimonyInput::Child { .. } => SupportType::Child,
            AlimonyInput::Spouse { .. } => SupportType::Spouse,
            AlimonyInput::Both { .. } => SupportType::Both,
        }
    }

    /// Returns the payer's monthly income.
    pub fn payer_monthly_income(&self) -> Decimal {
        match self {
            AlimonyInput::Child {
                payer_monthly_income,
                ..
            }
            | AlimonyInput::Spouse {
                payer_monthly_income,
                ..
            }
            | AlimonyInput::Both {
                payer_monthly_income,
                ..
            } => *payer_monthly_income,
        }
    }

    /// Returns the child count for variants that include children.
    pub fn child_count(&self) -> Option<u32> {
        match self {
            AlimonyInput::Child { child_count, .. } | AlimonyInput::Both { child_count, .. } => {
                Some(*child_count)
            }
            AlimonyInput::Spouse { .. } => None,
        }
    }

    /// Returns the other party's income for variants that include a spouse.
    pub fn other_party_monthly_income(&self) -> Option<Decimal> {
        match self {
            AlimonyInput::Spouse {
                other_party_monthly_income,
                ..
            }
            | AlimonyInput::Both {
                other_party_monthly_income,
                ..
            } => Some(*other_party_monthly_income),
            AlimonyInput::Child { .. } => None,
        }
    }

    /// Checks incomes are non-negative and at least one child is named.
    pub fn validate(&self) -> EngineResult<()> {
        let mut amounts = vec![("payer_monthly_income", self.payer_monthly_income())];
        if let Some(other) = self.other_party_monthly_income() {
            amounts.push(("other_party_monthly_income", other));
        }
        for (field, value) in amounts {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::invalid_input(field, "must not be negative"));
            }
        }

        if self.child_count() == Some(0) {
            return Err(EngineError::invalid_input(
                "child_count",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// The result of an alimony estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlimonyResult {
    /// The requested support type.
    pub support_type: SupportType,
    /// Share of income applied for child support; zero without children.
    pub child_support_rate: Decimal,
    /// Monthly child support.
    pub child_support: Decimal,
    /// `max(payer - other party, 0)`; zero without a spouse.
    pub income_gap: Decimal,
    /// Monthly spousal support.
    pub spousal_support: Decimal,
    /// `child_support + spousal_support`.
    pub total_support: Decimal,
    /// Rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl AlimonyResult {
    /// Returns the named outputs in display order.
    pub fn fields(&self) -> Vec<ResultField> {
        vec![
            ResultField::new("child_support_rate", self.child_support_rate, FieldKind::Rate),
            ResultField::money("child_support", self.child_support),
            ResultField::money("income_gap", self.income_gap),
            ResultField::money("spousal_support", self.spousal_support),
            ResultField::money("total_support", self.total_support),
        ]
    }
}

impl From<AlimonyResult> for CalculationOutcome {
    fn from(result: AlimonyResult) -> Self {
        CalculationOutcome {
            fields: result.fields(),
            audit_steps: result.audit_steps,
            warnings: vec![],
        }
    }
}

/// Returns the child support rate for `child_count` children:
/// `min(base + max(count - 1, 0) × additional, cap)`.
pub fn child_support_rate(child_count: u32, constants: &AlimonyConstants) -> Decimal {
    let additional_children = Decimal::from(child_count.saturating_sub(1));
    let rate = constants.child_base_rate + additional_children * constants.additional_child_rate;
    rate.min(constants.child_rate_cap)
}

/// Estimates monthly child and spousal support.
///
/// # Examples
///
/// ```
/// use statutory_engine::calculation::{calculate_alimony, AlimonyInput};
/// use statutory_engine::config::AlimonyConstants;
/// use rust_decimal::Decimal;
///
/// let constants = AlimonyConstants {
///     child_base_rate: Decimal::new(25, 2),
///     additional_child_rate: Decimal::new(5, 2),
///     child_rate_cap: Decimal::new(40, 2),
///     spousal_rate: Decimal::new(20, 2),
/// };
/// let input = AlimonyInput::Both {
///     payer_monthly_income: Decimal::from(20000),
///     child_count: 1,
///     other_party_monthly_income: Decimal::from(5000),
/// };
///
/// let result = calculate_alimony(&input, &constants).unwrap();
/// assert_eq!(result.child_support, Decimal::from(5000));
/// assert_eq!(result.spousal_support, Decimal::from(3000));
/// assert_eq!(result.total_support, Decimal::from(8000));
/// ```
pub fn calculate_alimony(
    input: &AlimonyInput,
    constants: &AlimonyConstants,
) -> EngineResult<AlimonyResult> {
    input.validate()?;

    let income = input.payer_monthly_income();
    let mut audit_steps = Vec::new();

    let (child_support_rate, child_support) = match input.child_count() {
        Some(child_count) => {
            let rate = child_support_rate(child_count, constants);
            let support = round_money(checked_mul("payer_monthly_income", income, rate)?);

            audit_steps.push(AuditStep {
                step_number: audit_steps.len() as u32 + 1,
                rule_id: "alimony_child_support".to_string(),
                rule_name: "Child Support".to_string(),
                legal_ref: ALIMONY_LEGAL_REF.to_string(),
                input: serde_json::json!({
                    "payer_monthly_income": income.normalize().to_string(),
                    "child_count": child_count,
                    "child_base_rate": constants.child_base_rate.normalize().to_string(),
                    "additional_child_rate": constants.additional_child_rate.normalize().to_string(),
                    "child_rate_cap": constants.child_rate_cap.normalize().to_string()
                }),
                output: serde_json::json!({
                    "child_support_rate": rate.normalize().to_string(),
                    "child_support": support.normalize().to_string()
                }),
                reasoning: format!(
                    "{} children → rate {} (cap {}); {} × {} = {}",
                    child_count,
                    rate.normalize(),
                    constants.child_rate_cap.normalize(),
                    income.normalize(),
                    rate.normalize(),
                    support.normalize()
                ),
            });

            (rate, support)
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let (income_gap, spousal_support) = match input.other_party_monthly_income() {
        Some(other) => {
            let gap = (income - other).max(Decimal::ZERO);
            let support = round_money(checked_mul(
                "payer_monthly_income",
                gap,
                constants.spousal_rate,
            )?);

            audit_steps.push(AuditStep {
                step_number: audit_steps.len() as u32 + 1,
                rule_id: "alimony_spousal_support".to_string(),
                rule_name: "Spousal Support".to_string(),
                legal_ref: ALIMONY_LEGAL_REF.to_string(),
                input: serde_json::json!({
                    "payer_monthly_income": income.normalize().to_string(),
                    "other_party_monthly_income": other.normalize().to_string(),
                    "spousal_rate": constants.spousal_rate.normalize().to_string()
                }),
                output: serde_json::json!({
                    "income_gap": gap.normalize().to_string(),
                    "spousal_support": support.normalize().to_string()
                }),
                reasoning: format!(
                    "max({} - {}, 0) = {}; {} × {} = {}",
                    income.normalize(),
                    other.normalize(),
                    gap.normalize(),
                    gap.normalize(),
                    constants.spousal_rate.normalize(),
                    support.normalize()
                ),
            });

            (gap, support)
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let total_support = checked_add("payer_monthly_income", child_support, spousal_support)?;

    audit_steps.push(AuditStep {
        step_number: audit_steps.len() as u32 + 1,
        rule_id: "alimony_total".to_string(),
        rule_name: "Total Support".to_string(),
        legal_ref: ALIMONY_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "child_support": child_support.normalize().to_string(),
            "spousal_support": spousal_support.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_support": total_support.normalize().to_string()
        }),
        reasoning: format!(
            "{} + {} = {} (estimate, not binding)",
            child_support.normalize(),
            spousal_support.normalize(),
            total_support.normalize()
        ),
    });

    Ok(AlimonyResult {
        support_type: input.support_type(),
        child_support_rate,
        child_support,
        income_gap,
        spousal_support,
        total_support,
        audit_steps,
    })
}

/// Registry adapter for [`calculate_alimony`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AlimonyCalculator;

impl StatutoryCalculator for AlimonyCalculator {
    fn id(&self) -> &str {
        "alimony"
    }

    fn title(&self) -> &str {
        "Nafaka"
    }

    fn category(&self) -> &str {
        "Aile Hukuku"
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::choice("support_type", &SupportType::TAGS),
            FieldDescriptor::number("payer_monthly_income"),
            FieldDescriptor::number("child_count").optional(),
            FieldDescriptor::number("other_party_monthly_income").optional(),
        ]
    }

    fn calculate(
        &self,
        input: &CalculationInput,
        constants: &StatutoryConstants,
    ) -> EngineResult<CalculationOutcome> {
        let input = AlimonyInput::from_input(input)?;
        calculate_alimony(&input, &constants.alimony).map(Into::into)
    }
}
