//! Error types for the Statutory Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating inputs, loading
//! statutory constants and running calculators.

use thiserror::Error;

/// The main error type for the Statutory Calculation Engine.
///
/// Validation failures (`InvalidInput`, `InvalidDateRange`) carry the name of
/// the offending field so the presentation layer can highlight it.
///
/// # Example
///
/// ```
/// use statutory_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "daily_gross_wage".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input field 'daily_gross_wage': must not be negative"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required field is missing, has the wrong kind, or is out of its domain.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A date failed to parse, or an end date precedes its start date.
    #[error("Invalid date range at '{field}': {message}")]
    InvalidDateRange {
        /// The date field that was invalid.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// An amount could not be formatted (NaN or infinite).
    #[error("Invalid amount: {value}")]
    InvalidAmount {
        /// The textual form of the rejected amount.
        value: String,
    },

    /// A bracket table is not contiguous, overlaps, or does not cover `[0, ∞)`.
    #[error("Invalid bracket table '{table}': {message}")]
    InvalidBracketTable {
        /// The name of the table.
        table: String,
        /// A description of the violated rule.
        message: String,
    },

    /// No calculator is registered under the requested id.
    #[error("Calculator not found: {id}")]
    CalculatorNotFound {
        /// The requested calculator id.
        id: String,
    },

    /// No statutory constants apply to the requested year.
    #[error("Statutory constants not found for year {year}")]
    ConstantsNotFound {
        /// The requested year.
        year: i32,
    },

    /// The constants for a year carry no bracket table for a calculator.
    #[error("Bracket table for calculator '{calculator}' not found for year {year}")]
    BracketTableNotFound {
        /// The calculator id.
        calculator: String,
        /// The constants year that was searched.
        year: i32,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`] on `field`.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidDateRange`] on `field`.
    pub fn invalid_date(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the offending field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } | Self::InvalidDateRange { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("child_count", "must be at least 1");
        assert_eq!(
            error.to_string(),
            "Invalid input field 'child_count': must be at least 1"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_field_and_message() {
        let error = EngineError::invalid_date("end_date", "precedes start_date");
        assert_eq!(
            error.to_string(),
            "Invalid date range at 'end_date': precedes start_date"
        );
    }

    #[test]
    fn test_invalid_amount_displays_value() {
        let error = EngineError::InvalidAmount {
            value: "NaN".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid amount: NaN");
    }

    #[test]
    fn test_constants_not_found_displays_year() {
        let error = EngineError::ConstantsNotFound { year: 1999 };
        assert_eq!(
            error.to_string(),
            "Statutory constants not found for year 1999"
        );
    }

    #[test]
    fn test_bracket_table_not_found_displays_calculator_and_year() {
        let error = EngineError::BracketTableNotFound {
            calculator: "court_costs".to_string(),
            year: 2024,
        };
        assert_eq!(
            error.to_string(),
            "Bracket table for calculator 'court_costs' not found for year 2024"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_field_is_exposed_for_validation_errors_only() {
        assert_eq!(
            EngineError::invalid_input("tenure_years", "negative").field(),
            Some("tenure_years")
        );
        assert_eq!(
            EngineError::invalid_date("start_date", "bad").field(),
            Some("start_date")
        );
        assert_eq!(
            EngineError::CalculatorNotFound {
                id: "x".to_string()
            }
            .field(),
            None
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::CalculatorNotFound {
                id: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
