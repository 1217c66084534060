//! Display formatting helpers.
//!
//! Pure conversions from amounts and dates to Turkish-locale display strings,
//! shared by the calculators' reasoning text and the report renderer.

use chrono::{Local, Locale, NaiveDateTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::parse_date;

/// Suffix appended to every formatted amount.
pub const CURRENCY_SUFFIX: &str = "₺";

/// Text shown in place of an end date for ongoing periods.
pub const ONGOING_LABEL: &str = "Devam ediyor";

const DISPLAY_LOCALE: Locale = Locale::tr_TR;

/// Formats a floating-point amount as whole currency units.
///
/// NaN and infinite values are rejected with [`EngineError::InvalidAmount`].
/// Finite values beyond the decimal range are grouped from their integer
/// digits.
///
/// # Example
///
/// ```
/// use statutory_engine::format::format_currency;
///
/// assert_eq!(format_currency(1234.0).unwrap(), "1.234 ₺");
/// assert!(format_currency(f64::NAN).is_err());
/// ```
pub fn format_currency(amount: f64) -> EngineResult<String> {
    if !amount.is_finite() {
        return Err(EngineError::InvalidAmount {
            value: amount.to_string(),
        });
    }

    match Decimal::from_f64(amount) {
        Some(decimal) => Ok(format_money(decimal)),
        None => Ok(group_amount(
            amount < 0.0,
            &format!("{:.0}", amount.abs().round()),
        )),
    }
}

/// Formats a decimal amount as whole currency units with `.` thousands
/// separators, rounding half away from zero.
///
/// # Example
///
/// ```
/// use statutory_engine::format::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(793_928, 1)), "79.393 ₺");
/// ```
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    group_amount(negative, &rounded.abs().trunc().to_string())
}

/// Inserts `.` every three digits and appends the currency suffix.
fn group_amount(negative: bool, digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!(
        "{}{} {}",
        if negative { "-" } else { "" },
        grouped,
        CURRENCY_SUFFIX
    )
}

/// Formats a timestamp in long form, e.g. `15 Ocak 2024 Pazartesi 14:30`.
///
/// Defaults to the current local time.
pub fn format_date(date: Option<NaiveDateTime>) -> String {
    let date = date.unwrap_or_else(|| Local::now().naive_local());
    format!(
        "{} {}",
        date.date().format_localized("%-d %B %Y %A", DISPLAY_LOCALE),
        date.format("%H:%M")
    )
}

/// Formats a period at month/year granularity, e.g. `Ocak 2020 – Aralık 2023`.
///
/// When `is_ongoing` is set, or no end date is given, the period is rendered
/// as ongoing and `end_date` is ignored.
///
/// # Example
///
/// ```
/// use statutory_engine::format::format_period;
///
/// assert_eq!(
///     format_period("2020-01-15", None, true).unwrap(),
///     "Ocak 2020 – Devam ediyor"
/// );
/// ```
pub fn format_period(
    start_date: &str,
    end_date: Option<&str>,
    is_ongoing: bool,
) -> EngineResult<String> {
    let start = parse_date("start_date", start_date)?;
    let start_label = start.format_localized("%B %Y", DISPLAY_LOCALE);

    let end_label = match end_date {
        Some(end_date) if !is_ongoing => {
            let end = parse_date("end_date", end_date)?;
            if end < start {
                return Err(EngineError::invalid_date(
                    "end_date",
                    format!("{} precedes start date {}", end, start),
                ));
            }
            end.format_localized("%B %Y", DISPLAY_LOCALE).to_string()
        }
        _ => ONGOING_LABEL.to_string(),
    };

    Ok(format!("{} – {}", start_label, end_label))
}
