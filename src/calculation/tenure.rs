//! Tenure and money arithmetic helpers shared by the calculators.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Average days per year used to convert a day count into tenure years.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Returns the tenure between two dates in fractional years:
/// `(end - start in days) / 365.25`.
///
/// Fails with [`EngineError::InvalidDateRange`] on `end_date` when the end
/// precedes the start.
///
/// # Example
///
/// ```
/// use statutory_engine::calculation::tenure_years;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(tenure_years(start, end).unwrap(), Decimal::from(4));
/// ```
pub fn tenure_years(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Decimal> {
    if end_date < start_date {
        return Err(EngineError::invalid_date(
            "end_date",
            format!("{} precedes start_date {}", end_date, start_date),
        ));
    }

    let days = (end_date - start_date).num_days();
    Ok(Decimal::from(days) / DAYS_PER_YEAR)
}

/// Rounds a monetary amount to kuruş (2 dp), half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies two amounts, failing with [`EngineError::InvalidInput`] on
/// `field` when the product leaves the decimal range.
///
/// # Example
///
/// ```
/// use statutory_engine::calculation::checked_mul;
/// use rust_decimal::Decimal;
///
/// assert_eq!(checked_mul("wage", Decimal::from(3), Decimal::from(7)).unwrap(), Decimal::from(21));
/// assert!(checked_mul("wage", Decimal::MAX, Decimal::from(2)).is_err());
/// ```
pub fn checked_mul(field: &str, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| too_large(field))
}

/// Adds two amounts, failing with [`EngineError::InvalidInput`] on `field`
/// when the sum leaves the decimal range.
pub fn checked_add(field: &str, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| too_large(field))
}

fn too_large(field: &str) -> EngineError {
    EngineError::invalid_input(field, "is too large to calculate with")
}
