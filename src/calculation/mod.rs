//! Calculation logic for the Statutory Calculation Engine.
//!
//! This module contains the statutory calculators (severance pay, notice pay,
//! alimony and the configuration-driven bracket calculators), the tenure and
//! rounding helpers they share, and the registry that dispatches to them by id.

mod alimony;
mod bracket_calculator;
mod notice_pay;
mod registry;
mod severance;
mod tenure;

pub use alimony::{
    ALIMONY_LEGAL_REF, AlimonyCalculator, AlimonyInput, AlimonyResult, SupportType,
    calculate_alimony, child_support_rate,
};
pub use bracket_calculator::{BracketCalculationResult, BracketCalculator, calculate_bracket};
pub use notice_pay::{
    NOTICE_LEGAL_REF, NoticePayCalculator, NoticePayInput, NoticePayResult, calculate_notice_pay,
};
pub use registry::{
    CalculatorDescriptor, CalculatorRegistry, FieldDescriptor, InputKind, StatutoryCalculator,
};
pub use severance::{
    SEVERANCE_LEGAL_REF, SEVERANCE_TAX_LEGAL_REF, STAMP_DUTY_LEGAL_REF, SeveranceCalculator,
    SeveranceInput, SeveranceResult, TerminationReason, calculate_severance,
};
pub use tenure::{DAYS_PER_YEAR, checked_add, checked_mul, round_money, tenure_years};
