//! Generic bracket calculators.
//!
//! A calculator in this family is fully described by a
//! [`BracketCalculatorDefinition`] and the year's bracket table registered
//! under the same id. Adding one means adding configuration, not code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{BracketCalculatorDefinition, BracketMode, StatutoryConstants};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, BracketTable, CalculationInput, CalculationOutcome, FieldKind, ResultField,
};

use super::registry::{FieldDescriptor, StatutoryCalculator};
use super::tenure::{checked_mul, round_money};

/// The result of a bracket calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketCalculationResult {
    /// The value looked up in the bracket table.
    pub lookup_value: Decimal,
    /// The amount the bracket value is applied to.
    pub base_amount: Decimal,
    /// Product of the factor fields (1 when there are none).
    pub factor: Decimal,
    /// The value of the bracket containing `lookup_value`.
    pub bracket_value: Decimal,
    /// The computed total.
    pub total: Decimal,
    /// Rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl BracketCalculationResult {
    /// Returns the named outputs in display order.
    pub fn fields(&self) -> Vec<ResultField> {
        vec![
            ResultField::new("lookup_value", self.lookup_value, FieldKind::Number),
            ResultField::new("base_amount", self.base_amount, FieldKind::Number),
            ResultField::new("bracket_value", self.bracket_value, FieldKind::Number),
            ResultField::money("total", self.total),
        ]
    }
}

impl From<BracketCalculationResult> for CalculationOutcome {
    fn from(result: BracketCalculationResult) -> Self {
        CalculationOutcome {
            fields: result.fields(),
            audit_steps: result.audit_steps,
            warnings: vec![],
        }
    }
}

/// Runs one bracket calculation.
///
/// - `rate`: `base × Π factors × bracket value`
/// - `fixed`: `bracket value × Π factors`
/// - `marginal`: `marginal total of lookup × Π factors`
///
/// `base` is `base_field` when set, otherwise the lookup value.
///
/// # Examples
///
/// ```
/// use statutory_engine::calculation::calculate_bracket;
/// use statutory_engine::config::{BracketCalculatorDefinition, BracketMode};
/// use statutory_engine::models::{BracketTable, CalculationInput, TenureBracket};
/// use rust_decimal::Decimal;
///
/// let definition = BracketCalculatorDefinition {
///     id: "court_costs".to_string(),
///     title: "Dava Masrafları".to_string(),
///     category: "Harçlar".to_string(),
///     lookup_field: "claim_amount".to_string(),
///     base_field: None,
///     factor_fields: vec![],
///     mode: BracketMode::Rate,
/// };
/// let table = BracketTable::new(
///     "court_costs",
///     vec![TenureBracket { min: Decimal::ZERO, max: None, value: Decimal::new(5, 2) }],
/// )
/// .unwrap();
/// let input = CalculationInput::new().with("claim_amount", 1000);
///
/// let result = calculate_bracket(&definition, &input, &table).unwrap();
/// assert_eq!(result.total, Decimal::from(50));
/// ```
pub fn calculate_bracket(
    definition: &BracketCalculatorDefinition,
    input: &CalculationInput,
    table: &BracketTable<Decimal>,
) -> EngineResult<BracketCalculationResult> {
    let lookup_value = input.decimal(&definition.lookup_field)?;
    let base_amount = match &definition.base_field {
        Some(field) => input.decimal(field)?,
        None => lookup_value,
    };

    let base_field = definition
        .base_field
        .as_deref()
        .unwrap_or(definition.lookup_field.as_str());

    let mut factors = Vec::with_capacity(definition.factor_fields.len());
    for field in &definition.factor_fields {
        factors.push((field.as_str(), input.decimal(field)?));
    }
    let factor = factors
        .iter()
        .try_fold(Decimal::ONE, |product, (field, value)| {
            checked_mul(field, product, *value)
        })?;

    let bracket = table
        .lookup(lookup_value)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no '{}' bracket covers {}", definition.id, lookup_value),
        })?;
    let bracket_value = bracket.value;

    let mut audit_steps = vec![AuditStep {
        step_number: 1,
        rule_id: format!("{}_bracket_lookup", definition.id),
        rule_name: format!("{} Bracket Lookup", definition.title),
        legal_ref: String::new(),
        input: serde_json::json!({
            definition.lookup_field.clone(): lookup_value.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket_min": bracket.min.normalize().to_string(),
            "bracket_max": bracket.max.map(|max| max.normalize().to_string()),
            "bracket_value": bracket_value.normalize().to_string()
        }),
        reasoning: format!(
            "{} = {} falls in the bracket starting at {}",
            definition.lookup_field,
            lookup_value.normalize(),
            bracket.min.normalize()
        ),
    }];

    let (raw_total, formula) = match definition.mode {
        BracketMode::Rate => (
            checked_mul(
                base_field,
                checked_mul(base_field, base_amount, factor)?,
                bracket_value,
            )?,
            format!(
                "{} × {} × {}",
                base_amount.normalize(),
                factor.normalize(),
                bracket_value.normalize()
            ),
        ),
        BracketMode::Fixed => (
            checked_mul(
                definition
                    .factor_fields
                    .last()
                    .map_or(&definition.lookup_field, |field| field),
                bracket_value,
                factor,
            )?,
            format!("{} × {}", bracket_value.normalize(), factor.normalize()),
        ),
        BracketMode::Marginal => {
            let tiered = table.marginal_total(lookup_value).ok_or_else(|| {
                EngineError::invalid_input(
                    &definition.lookup_field,
                    "is too large to calculate with",
                )
            })?;
            (
                checked_mul(&definition.lookup_field, tiered, factor)?,
                format!(
                    "tiered total {} × {}",
                    tiered.normalize(),
                    factor.normalize()
                ),
            )
        }
    };
    let total = round_money(raw_total);

    let factor_values: serde_json::Map<String, serde_json::Value> = factors
        .iter()
        .map(|(name, value)| (name.to_string(), value.normalize().to_string().into()))
        .collect();

    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: format!("{}_total", definition.id),
        rule_name: format!("{} Total", definition.title),
        legal_ref: String::new(),
        input: serde_json::json!({
            "mode": definition.mode,
            "base_amount": base_amount.normalize().to_string(),
            "factors": factor_values,
            "bracket_value": bracket_value.normalize().to_string()
        }),
        output: serde_json::json!({
            "total": total.normalize().to_string()
        }),
        reasoning: format!("{} = {}", formula, total.normalize()),
    });

    Ok(BracketCalculationResult {
        lookup_value,
        base_amount,
        factor,
        bracket_value,
        total,
        audit_steps,
    })
}

/// A calculator driven entirely by its definition and bracket table.
#[derive(Debug, Clone)]
pub struct BracketCalculator {
    definition: BracketCalculatorDefinition,
}

impl BracketCalculator {
    /// Wraps a definition.
    pub fn new(definition: BracketCalculatorDefinition) -> Self {
        Self { definition }
    }

    /// Returns the definition.
    pub fn definition(&self) -> &BracketCalculatorDefinition {
        &self.definition
    }
}

impl StatutoryCalculator for BracketCalculator {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn title(&self) -> &str {
        &self.definition.title
    }

    fn category(&self) -> &str {
        &self.definition.category
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        let mut names = vec![self.definition.lookup_field.as_str()];
        names.extend(self.definition.base_field.as_deref());
        names.extend(self.definition.factor_fields.iter().map(String::as_str));

        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(names.len());
        for name in names {
            if !fields.iter().any(|field| field.name == name) {
                fields.push(FieldDescriptor::number(name));
            }
        }
        fields
    }

    fn calculate(
        &self,
        input: &CalculationInput,
        constants: &StatutoryConstants,
    ) -> EngineResult<CalculationOutcome> {
        let table = constants.bracket_table(&self.definition.id)?;
        calculate_bracket(&self.definition, input, table).map(Into::into)
    }
}
