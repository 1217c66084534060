//! Flat calculation input record.
//!
//! Form fields arrive as a flat mapping of names to numbers, strings or
//! booleans. [`CalculationInput`] holds that mapping and offers typed
//! accessors that validate each field at the boundary, reporting the
//! offending field name on failure.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The date format accepted for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single input value.
///
/// Numeric strings deserialize as [`InputValue::Number`], so form values such
/// as `"20000"` are accepted wherever a number is expected. Anything else
/// (numbers outside the decimal range, `null`, arrays, objects) is kept as
/// [`InputValue::Unsupported`] and rejected by the accessor that reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// A boolean flag.
    Flag(bool),
    /// A decimal number.
    Number(Decimal),
    /// Free text: dates and enumerated tags.
    Text(String),
    /// A JSON value no other variant accepts.
    Unsupported(serde_json::Value),
}

impl From<Decimal> for InputValue {
    fn from(value: Decimal) -> Self {
        InputValue::Number(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Number(Decimal::from(value))
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        InputValue::Number(Decimal::from(value))
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        InputValue::Number(Decimal::from(value))
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Flag(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

/// A flat mapping of named input fields.
///
/// # Example
///
/// ```
/// use statutory_engine::models::CalculationInput;
/// use rust_decimal::Decimal;
///
/// let input = CalculationInput::new()
///     .with("daily_gross_wage", 500)
///     .with("notice_already_given", false);
///
/// assert_eq!(input.decimal("daily_gross_wage").unwrap(), Decimal::from(500));
/// assert!(input.decimal("tenure_years").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationInput {
    fields: BTreeMap<String, InputValue>,
}

impl CalculationInput {
    /// Creates an empty input record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: impl Into<InputValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, field: &str, value: impl Into<InputValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.fields.get(field)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Reads a required non-negative number.
    pub fn decimal(&self, field: &str) -> EngineResult<Decimal> {
        self.optional_decimal(field)?
            .ok_or_else(|| EngineError::invalid_input(field, "is required"))
    }

    /// Reads an optional non-negative number.
    pub fn optional_decimal(&self, field: &str) -> EngineResult<Option<Decimal>> {
        let value = match self.fields.get(field) {
            None => return Ok(None),
            Some(InputValue::Number(value)) => *value,
            Some(InputValue::Text(text)) => Decimal::from_str(text.trim())
                .map_err(|_| EngineError::invalid_input(field, "must be numeric"))?,
            Some(InputValue::Unsupported(serde_json::Value::Number(_))) => {
                return Err(EngineError::invalid_input(
                    field,
                    "is outside the supported numeric range",
                ));
            }
            Some(InputValue::Flag(_)) | Some(InputValue::Unsupported(_)) => {
                return Err(EngineError::invalid_input(field, "must be numeric"));
            }
        };

        if value.is_sign_negative() && !value.is_zero() {
            return Err(EngineError::invalid_input(field, "must not be negative"));
        }
        Ok(Some(value))
    }

    /// Reads a required whole, non-negative count.
    pub fn count(&self, field: &str) -> EngineResult<u32> {
        let value = self.decimal(field)?;
        if !value.fract().is_zero() {
            return Err(EngineError::invalid_input(field, "must be a whole number"));
        }
        value
            .to_u32()
            .ok_or_else(|| EngineError::invalid_input(field, "is out of range"))
    }

    /// Reads a required text field.
    pub fn text(&self, field: &str) -> EngineResult<&str> {
        match self.fields.get(field) {
            Some(InputValue::Text(text)) if !text.trim().is_empty() => Ok(text.trim()),
            Some(InputValue::Text(_)) | None => {
                Err(EngineError::invalid_input(field, "is required"))
            }
            Some(_) => Err(EngineError::invalid_input(field, "must be text")),
        }
    }

    /// Reads and parses a required enumerated tag.
    pub fn tag<T>(&self, field: &str) -> EngineResult<T>
    where
        T: FromStr<Err = String>,
    {
        self.text(field)?
            .parse::<T>()
            .map_err(|message| EngineError::invalid_input(field, message))
    }

    /// Reads a required `YYYY-MM-DD` date.
    pub fn date(&self, field: &str) -> EngineResult<NaiveDate> {
        parse_date(field, self.text(field)?)
    }

    /// Reads an optional `YYYY-MM-DD` date.
    pub fn optional_date(&self, field: &str) -> EngineResult<Option<NaiveDate>> {
        if self.contains(field) {
            self.date(field).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads an optional boolean flag, defaulting to false.
    pub fn flag(&self, field: &str) -> EngineResult<bool> {
        match self.fields.get(field) {
            None => Ok(false),
            Some(InputValue::Flag(value)) => Ok(*value),
            Some(InputValue::Text(text)) => match text.trim() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(EngineError::invalid_input(field, "must be true or false")),
            },
            Some(InputValue::Number(_)) | Some(InputValue::Unsupported(_)) => {
                Err(EngineError::invalid_input(field, "must be true or false"))
            }
        }
    }
}

/// Parses a `YYYY-MM-DD` date, reporting `field` on failure.
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        EngineError::invalid_date(field, format!("'{}' is not a valid date: {}", value, e))
    })
}
