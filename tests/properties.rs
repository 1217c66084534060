//! Property-based tests for the statutory calculators.
//!
//! Verifies invariants that must hold for every valid input:
//! - Severance: resignation forfeits, zero tenure yields zero, net never exceeds gross
//! - Notice pay: weeks are monotonic in tenure, notice already given pays nothing
//! - Alimony: total is the exact sum, child rate never exceeds its cap
//! - Bracket tables: marginal totals are monotonic
//! - Formatting: grouped digits, sign kept, no decimal part
//! - Range: amounts anywhere in the decimal range fail cleanly, never panic

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use statutory_engine::calculation::{
    AlimonyInput, CalculatorRegistry, NoticePayInput, SeveranceInput, TerminationReason,
    calculate_alimony, calculate_notice_pay, calculate_severance, child_support_rate,
};
use statutory_engine::config::{ConfigLoader, SeveranceConstants, StatutoryConstants};
use statutory_engine::error::EngineError;
use statutory_engine::format::format_currency;
use statutory_engine::models::CalculationInput;

// =============================================================================
// Helpers
// =============================================================================

fn config() -> &'static ConfigLoader {
    static CONFIG: OnceLock<ConfigLoader> = OnceLock::new();
    CONFIG.get_or_init(|| ConfigLoader::load("./config/tr").expect("Failed to load config"))
}

fn constants() -> &'static StatutoryConstants {
    config().constants_for_year(2024).expect("2024 constants")
}

fn registry() -> &'static CalculatorRegistry {
    static REGISTRY: OnceLock<CalculatorRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        CalculatorRegistry::with_defaults(config().bracket_calculators())
            .expect("Failed to build registry")
    })
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

// =============================================================================
// Proptest strategies
// =============================================================================

/// Money amounts with kuruş precision, up to 10 million.
fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000_000).prop_map(|kurus| Decimal::new(kurus, 2))
}

/// Tenure in years with 4 dp, up to 50 years.
fn arb_tenure() -> impl Strategy<Value = Decimal> {
    (0i64..=500_000).prop_map(|ten_thousandths| Decimal::new(ten_thousandths, 4))
}

/// Rates from 0 to 2 with 5 dp; above 1 forces over-deduction.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=200_000).prop_map(|units| Decimal::new(units, 5))
}

/// Any non-negative decimal: full 96-bit mantissa, scale up to 10.
fn arb_wide_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=10)
        .prop_map(|(lo, mid, hi, scale)| Decimal::from_parts(lo, mid, hi, false, scale))
}

fn arb_reason() -> impl Strategy<Value = TerminationReason> {
    prop_oneof![
        Just(TerminationReason::EmployerTermination),
        Just(TerminationReason::Resignation),
        Just(TerminationReason::Retirement),
    ]
}

/// A severance input with an end date up to ~40 years after the start.
fn arb_severance_input() -> impl Strategy<Value = SeveranceInput> {
    (0u64..=14_600, arb_money(), arb_reason()).prop_map(|(days, wage, reason)| SeveranceInput {
        start_date: base_date(),
        end_date: base_date() + Days::new(days),
        last_monthly_gross_wage: wage,
        termination_reason: reason,
    })
}

fn arb_alimony_input() -> impl Strategy<Value = AlimonyInput> {
    prop_oneof![
        (arb_money(), 1u32..=20).prop_map(|(income, children)| AlimonyInput::Child {
            payer_monthly_income: income,
            child_count: children,
        }),
        (arb_money(), arb_money()).prop_map(|(income, other)| AlimonyInput::Spouse {
            payer_monthly_income: income,
            other_party_monthly_income: other,
        }),
        (arb_money(), 1u32..=20, arb_money()).prop_map(|(income, children, other)| {
            AlimonyInput::Both {
                payer_monthly_income: income,
                child_count: children,
                other_party_monthly_income: other,
            }
        }),
    ]
}

// =============================================================================
// Severance
// =============================================================================

proptest! {
    #[test]
    fn resignation_forfeits_severance(input in arb_severance_input()) {
        let input = SeveranceInput { termination_reason: TerminationReason::Resignation, ..input };
        let result = calculate_severance(&input, &constants().severance).unwrap();

        prop_assert_eq!(result.net_severance, Decimal::ZERO);
        prop_assert_eq!(result.income_tax, Decimal::ZERO);
    }

    #[test]
    fn zero_tenure_means_zero_gross(wage in arb_money(), reason in arb_reason()) {
        let input = SeveranceInput {
            start_date: base_date(),
            end_date: base_date(),
            last_monthly_gross_wage: wage,
            termination_reason: reason,
        };
        let result = calculate_severance(&input, &constants().severance).unwrap();

        prop_assert_eq!(result.gross_severance, Decimal::ZERO);
    }

    #[test]
    fn net_never_exceeds_gross(
        input in arb_severance_input(),
        ceiling in arb_money(),
        income_tax_rate in arb_rate(),
        stamp_duty_rate in arb_rate(),
    ) {
        let constants = SeveranceConstants {
            annual_ceiling: ceiling,
            income_tax_rate,
            stamp_duty_rate,
        };
        let result = calculate_severance(&input, &constants).unwrap();

        prop_assert!(result.net_severance <= result.gross_severance);
        prop_assert!(result.net_severance >= Decimal::ZERO);
        prop_assert!(result.income_tax >= Decimal::ZERO);
        prop_assert!(result.stamp_duty >= Decimal::ZERO);
    }
}

// =============================================================================
// Notice pay
// =============================================================================

proptest! {
    #[test]
    fn notice_weeks_are_monotonic(a in arb_tenure(), b in arb_tenure(), wage in arb_money()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let notice = &constants().notice;

        let low_result = calculate_notice_pay(
            &NoticePayInput { tenure_years: low, daily_gross_wage: wage, notice_already_given: false },
            notice,
        )
        .unwrap();
        let high_result = calculate_notice_pay(
            &NoticePayInput { tenure_years: high, daily_gross_wage: wage, notice_already_given: false },
            notice,
        )
        .unwrap();

        prop_assert!(low_result.notice_weeks <= high_result.notice_weeks);
    }

    #[test]
    fn notice_already_given_pays_nothing(tenure in arb_tenure(), wage in arb_money()) {
        let result = calculate_notice_pay(
            &NoticePayInput { tenure_years: tenure, daily_gross_wage: wage, notice_already_given: true },
            &constants().notice,
        )
        .unwrap();

        prop_assert_eq!(result.notice_pay, Decimal::ZERO);
    }
}

// =============================================================================
// Alimony
// =============================================================================

proptest! {
    #[test]
    fn total_support_is_exact_sum(input in arb_alimony_input()) {
        let result = calculate_alimony(&input, &constants().alimony).unwrap();

        prop_assert_eq!(result.total_support, result.child_support + result.spousal_support);
    }

    #[test]
    fn child_rate_never_exceeds_cap(children in 1u32..=u32::MAX) {
        let alimony = &constants().alimony;
        prop_assert!(child_support_rate(children, alimony) <= alimony.child_rate_cap);
    }
}

// =============================================================================
// Bracket tables
// =============================================================================

proptest! {
    #[test]
    fn marginal_total_is_monotonic(a in arb_money(), b in arb_money()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let table = constants().bracket_table("attorney_fee").unwrap();

        prop_assert!(table.marginal_total(low).unwrap() <= table.marginal_total(high).unwrap());
    }

    #[test]
    fn every_non_negative_value_has_a_bracket(value in arb_money()) {
        for table in constants().bracket_tables.values() {
            prop_assert!(table.lookup(value).is_some());
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

proptest! {
    #[test]
    fn currency_keeps_sign_and_magnitude(amount in -1_000_000_000_000i64..=1_000_000_000_000) {
        let formatted = format_currency(amount as f64).unwrap();

        prop_assert!(formatted.ends_with(" ₺"));
        prop_assert!(!formatted.contains(','));
        prop_assert_eq!(formatted.starts_with('-'), amount < 0);

        let digits: String = formatted.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits, amount.unsigned_abs().to_string());
    }
}

// =============================================================================
// Range
// =============================================================================

fn assert_ok_or_invalid_input(id: &str, input: &CalculationInput) -> Result<(), TestCaseError> {
    match registry().calculate(id, input, Some(2024), config().config()) {
        Ok(_) | Err(EngineError::InvalidInput { .. }) => Ok(()),
        Err(other) => Err(TestCaseError::fail(format!("{}: unexpected {:?}", id, other))),
    }
}

proptest! {
    #[test]
    fn wide_amounts_never_panic(
        a in arb_wide_decimal(),
        b in arb_wide_decimal(),
        children in 1u32..=20,
    ) {
        assert_ok_or_invalid_input(
            "notice_pay",
            &CalculationInput::new()
                .with("tenure_years", b)
                .with("daily_gross_wage", a),
        )?;
        assert_ok_or_invalid_input(
            "severance",
            &CalculationInput::new()
                .with("start_date", "1990-01-01")
                .with("end_date", "2024-01-01")
                .with("last_monthly_gross_wage", a)
                .with("termination_reason", "employer_termination"),
        )?;
        assert_ok_or_invalid_input(
            "alimony",
            &CalculationInput::new()
                .with("support_type", "both")
                .with("payer_monthly_income", a)
                .with("child_count", children)
                .with("other_party_monthly_income", b),
        )?;
        assert_ok_or_invalid_input(
            "overtime",
            &CalculationInput::new()
                .with("hourly_gross_wage", a)
                .with("overtime_hours", b),
        )?;
        assert_ok_or_invalid_input(
            "title_deed_fee",
            &CalculationInput::new()
                .with("sale_price", a)
                .with("party_count", b),
        )?;
        for id in ["enforcement_costs", "attorney_fee", "court_costs"] {
            assert_ok_or_invalid_input(id, &CalculationInput::new().with("claim_amount", a))?;
        }
    }
}
