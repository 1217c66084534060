//! Configuration types for statutory calculations.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::BracketTable;

/// Metadata about the jurisdiction the constants belong to.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code (e.g., "TR").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Currency code used for amounts (e.g., "TRY").
    pub currency: String,
    /// Where the figures come from and how authoritative they are.
    pub source_note: String,
}

/// Severance pay constants.
#[derive(Debug, Clone, Deserialize)]
pub struct SeveranceConstants {
    /// Statutory per-year cap on the wage used for severance.
    pub annual_ceiling: Decimal,
    /// Flat income tax rate on the taxable excess.
    pub income_tax_rate: Decimal,
    /// Flat stamp duty rate on the full gross amount.
    pub stamp_duty_rate: Decimal,
}

/// Notice pay constants.
#[derive(Debug, Clone, Deserialize)]
pub struct NoticeConstants {
    /// Notice period in weeks by tenure in years.
    pub weeks: BracketTable<u32>,
}

/// Alimony / support percentages.
#[derive(Debug, Clone, Deserialize)]
pub struct AlimonyConstants {
    /// Child support rate for a single child.
    pub child_base_rate: Decimal,
    /// Rate added for each additional child.
    pub additional_child_rate: Decimal,
    /// Upper bound on the child support rate.
    pub child_rate_cap: Decimal,
    /// Share of the income gap paid as spousal support.
    pub spousal_rate: Decimal,
}

/// All statutory constants applying from a given calendar year.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConstants {
    /// The first calendar year these constants apply to.
    pub year: i32,
    /// A short label, e.g. "2024 örnek değerler".
    pub label: String,
    /// Severance pay constants.
    pub severance: SeveranceConstants,
    /// Notice pay constants.
    pub notice: NoticeConstants,
    /// Alimony / support constants.
    pub alimony: AlimonyConstants,
    /// Bracket tables for the generic calculators, keyed by calculator id.
    #[serde(default)]
    pub bracket_tables: HashMap<String, BracketTable<Decimal>>,
}

impl StatutoryConstants {
    /// Returns the bracket table registered for a calculator.
    pub fn bracket_table(&self, calculator: &str) -> EngineResult<&BracketTable<Decimal>> {
        self.bracket_tables
            .get(calculator)
            .ok_or_else(|| EngineError::BracketTableNotFound {
                calculator: calculator.to_string(),
                year: self.year,
            })
    }

    /// Checks that every rate is non-negative.
    ///
    /// Rates above 1 are accepted; the severance calculator reports the
    /// resulting over-deduction as a warning instead.
    pub fn validate(&self) -> Result<(), String> {
        let rates = [
            ("severance.annual_ceiling", self.severance.annual_ceiling),
            ("severance.income_tax_rate", self.severance.income_tax_rate),
            ("severance.stamp_duty_rate", self.severance.stamp_duty_rate),
            ("alimony.child_base_rate", self.alimony.child_base_rate),
            ("alimony.additional_child_rate", self.alimony.additional_child_rate),
            ("alimony.child_rate_cap", self.alimony.child_rate_cap),
            ("alimony.spousal_rate", self.alimony.spousal_rate),
        ];

        if let Some((name, value)) = rates.iter().find(|(_, value)| value.is_sign_negative()) {
            return Err(format!("{} must not be negative, got {}", name, value));
        }

        for (calculator, table) in &self.bracket_tables {
            if table.brackets().iter().any(|b| b.value.is_sign_negative()) {
                return Err(format!(
                    "bracket table '{}' contains a negative value",
                    calculator
                ));
            }
        }

        Ok(())
    }
}

/// How a bracket calculator turns the looked-up bracket into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMode {
    /// `base × factors × bracket value`.
    Rate,
    /// `bracket value × factors`.
    Fixed,
    /// Tiered accumulation of the lookup value across the bands, `× factors`.
    Marginal,
}

/// Declares a generic bracket calculator: its input shape and formula mode.
///
/// The bracket table itself is year-specific and lives in
/// [`StatutoryConstants::bracket_tables`] under the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketCalculatorDefinition {
    /// Calculator id, also the key of its bracket table.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display category.
    pub category: String,
    /// The input field looked up in the bracket table.
    pub lookup_field: String,
    /// The input field multiplied in `rate` mode; defaults to `lookup_field`.
    #[serde(default)]
    pub base_field: Option<String>,
    /// Additional input fields multiplied into the total.
    #[serde(default)]
    pub factor_fields: Vec<String>,
    /// The formula mode.
    pub mode: BracketMode,
}

/// Structure of `jurisdiction.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionConfig {
    /// Jurisdiction metadata.
    pub jurisdiction: JurisdictionMetadata,
    /// Generic bracket calculators to register.
    #[serde(default)]
    pub bracket_calculators: Vec<BracketCalculatorDefinition>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Jurisdiction metadata.
    metadata: JurisdictionMetadata,
    /// Generic bracket calculator definitions.
    bracket_calculators: Vec<BracketCalculatorDefinition>,
    /// Constants by year (sorted oldest first).
    years: Vec<StatutoryConstants>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: JurisdictionMetadata,
        bracket_calculators: Vec<BracketCalculatorDefinition>,
        years: Vec<StatutoryConstants>,
    ) -> Self {
        let mut sorted_years = years;
        sorted_years.sort_by_key(|constants| constants.year);
        Self {
            metadata,
            bracket_calculators,
            years: sorted_years,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns the bracket calculator definitions.
    pub fn bracket_calculators(&self) -> &[BracketCalculatorDefinition] {
        &self.bracket_calculators
    }

    /// Returns all constant sets, oldest first.
    pub fn years(&self) -> &[StatutoryConstants] {
        &self.years
    }

    /// Returns the constants applying to `year`: the latest set whose
    /// `year` is not after the requested one.
    pub fn constants_for_year(&self, year: i32) -> EngineResult<&StatutoryConstants> {
        self.years
            .iter()
            .rfind(|constants| constants.year <= year)
            .ok_or(EngineError::ConstantsNotFound { year })
    }
}

/// Constants shipped for 2024, for unit tests.
#[cfg(test)]
pub(crate) fn test_constants() -> StatutoryConstants {
    serde_yaml::from_str(include_str!("../../config/tr/years/2024.yaml"))
        .expect("bundled 2024 constants parse")
}
