//! The pluggable calculator family.
//!
//! Every calculator implements [`StatutoryCalculator`]; the
//! [`CalculatorRegistry`] maps ids to implementations, resolves the
//! constants for the applicable year and wraps each outcome in a
//! [`CalculationResult`].

use std::time::Instant;

use chrono::{Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{BracketCalculatorDefinition, EngineConfig, StatutoryConstants};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, CalculationInput, CalculationOutcome, CalculationResult, ADVISORY_NOTICE,
    field_values,
};

use super::alimony::AlimonyCalculator;
use super::bracket_calculator::BracketCalculator;
use super::notice_pay::NoticePayCalculator;
use super::severance::SeveranceCalculator;

/// The kind of value an input field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// A non-negative decimal.
    Number,
    /// A `YYYY-MM-DD` date.
    Date,
    /// A boolean.
    Flag,
    /// One of a fixed set of tags.
    Choice,
}

/// Describes one input field a calculator reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name in the input record.
    pub name: String,
    /// Expected value kind.
    pub kind: InputKind,
    /// Whether the field must be present.
    pub required: bool,
    /// Accepted tags for [`InputKind::Choice`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    fn new(name: &str, kind: InputKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            options: vec![],
        }
    }

    /// A required number.
    pub fn number(name: &str) -> Self {
        Self::new(name, InputKind::Number)
    }

    /// A required date.
    pub fn date(name: &str) -> Self {
        Self::new(name, InputKind::Date)
    }

    /// An optional flag; absent means false.
    pub fn flag(name: &str) -> Self {
        Self::new(name, InputKind::Flag).optional()
    }

    /// A required tag from `options`.
    pub fn choice(name: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|option| option.to_string()).collect(),
            ..Self::new(name, InputKind::Choice)
        }
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Public description of a registered calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorDescriptor {
    /// Calculator id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display category.
    pub category: String,
    /// Input fields, in form order.
    pub fields: Vec<FieldDescriptor>,
}

/// A statutory calculator: a typed input shape, a formula over the year's
/// constants, and a flat output shape.
///
/// Implementations must be pure. They read only the input record and the
/// constants they are handed.
pub trait StatutoryCalculator: Send + Sync {
    /// Stable id used in routes and as the bracket table key.
    fn id(&self) -> &str;

    /// Display title.
    fn title(&self) -> &str;

    /// Display category.
    fn category(&self) -> &str;

    /// Input fields the calculator reads.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// The year whose constants apply when the caller names none.
    fn reference_year(&self, _input: &CalculationInput) -> Option<i32> {
        None
    }

    /// Validates the input and runs the formula.
    fn calculate(
        &self,
        input: &CalculationInput,
        constants: &StatutoryConstants,
    ) -> EngineResult<CalculationOutcome>;

    /// Returns the public description.
    fn descriptor(&self) -> CalculatorDescriptor {
        CalculatorDescriptor {
            id: self.id().to_string(),
            title: self.title().to_string(),
            category: self.category().to_string(),
            fields: self.fields(),
        }
    }
}

/// Calculators keyed by id, in registration order.
#[derive(Default)]
pub struct CalculatorRegistry {
    calculators: Vec<Box<dyn StatutoryCalculator>>,
}

impl CalculatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding severance, notice pay, alimony and one
    /// [`BracketCalculator`] per definition.
    pub fn with_defaults(definitions: &[BracketCalculatorDefinition]) -> EngineResult<Self> {
        let mut registry = Self::new();
        registry.register(SeveranceCalculator)?;
        registry.register(NoticePayCalculator)?;
        registry.register(AlimonyCalculator)?;
        for definition in definitions {
            registry.register(BracketCalculator::new(definition.clone()))?;
        }
        Ok(registry)
    }

    /// Adds a calculator. Fails if the id is already taken.
    pub fn register<C>(&mut self, calculator: C) -> EngineResult<()>
    where
        C: StatutoryCalculator + 'static,
    {
        if self.get(calculator.id()).is_some() {
            return Err(EngineError::invalid_input(
                "id",
                format!("calculator '{}' is already registered", calculator.id()),
            ));
        }
        self.calculators.push(Box::new(calculator));
        Ok(())
    }

    /// Returns the calculator registered under `id`.
    pub fn get(&self, id: &str) -> Option<&dyn StatutoryCalculator> {
        self.calculators
            .iter()
            .find(|calculator| calculator.id() == id)
            .map(|calculator| calculator.as_ref())
    }

    /// Returns the registered ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.id()).collect()
    }

    /// Returns every calculator's descriptor in registration order.
    pub fn descriptors(&self) -> Vec<CalculatorDescriptor> {
        self.calculators.iter().map(|c| c.descriptor()).collect()
    }

    /// Number of registered calculators.
    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Runs calculator `id` with the constants for the applicable year.
    ///
    /// The year is `year` when given, otherwise the calculator's reference
    /// year for the input, otherwise the current year.
    pub fn calculate(
        &self,
        id: &str,
        input: &CalculationInput,
        year: Option<i32>,
        config: &EngineConfig,
    ) -> EngineResult<CalculationResult> {
        let start_time = Instant::now();

        let calculator = self
            .get(id)
            .ok_or_else(|| EngineError::CalculatorNotFound { id: id.to_string() })?;

        let requested_year = year
            .or_else(|| calculator.reference_year(input))
            .unwrap_or_else(|| Local::now().year());
        let constants = config.constants_for_year(requested_year)?;

        debug!(
            calculator = id,
            requested_year,
            constants_year = constants.year,
            "Dispatching calculation"
        );

        let outcome = calculator.calculate(input, constants)?;
        let duration_us = start_time.elapsed().as_micros() as u64;

        debug!(
            calculator = id,
            steps = outcome.audit_steps.len(),
            warnings = outcome.warnings.len(),
            duration_us,
            "Calculation finished"
        );

        Ok(CalculationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            calculator_id: calculator.id().to_string(),
            title: calculator.title().to_string(),
            constants_year: constants.year,
            values: field_values(&outcome.fields),
            fields: outcome.fields,
            disclaimer: ADVISORY_NOTICE.to_string(),
            audit_trace: AuditTrace {
                steps: outcome.audit_steps,
                warnings: outcome.warnings,
                duration_us,
            },
        })
    }
}

impl std::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorRegistry")
            .field("calculators", &self.ids())
            .finish()
    }
}
