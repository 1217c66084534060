//! Bracket table model.
//!
//! A [`BracketTable`] maps a continuous, non-negative input (tenure in years,
//! a claim amount, a sale price) onto a discrete value through an ordered set
//! of contiguous bands. Lower bounds are inclusive and upper bounds exclusive;
//! the last band is unbounded so the table always covers `[0, ∞)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// A single band of a bracket table.
///
/// # Example
///
/// ```
/// use statutory_engine::models::TenureBracket;
/// use rust_decimal::Decimal;
///
/// let bracket = TenureBracket {
///     min: Decimal::new(15, 1),
///     max: Some(Decimal::from(3)),
///     value: 4u32,
/// };
/// assert!(bracket.contains(Decimal::new(15, 1)));
/// assert!(!bracket.contains(Decimal::from(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureBracket<V> {
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Exclusive upper bound, `None` for the open-ended last band.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// The rate, multiplier, week count or fee attached to this band.
    pub value: V,
}

impl<V> TenureBracket<V> {
    /// Returns true if `x` falls inside `[min, max)`.
    pub fn contains(&self, x: Decimal) -> bool {
        x >= self.min && self.max.is_none_or(|max| x < max)
    }
}

/// An ordered, validated table of [`TenureBracket`]s.
///
/// Construction rejects tables that do not start at zero, have gaps or
/// overlaps, contain empty bands, or end with a bounded band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable<V> {
    brackets: Vec<TenureBracket<V>>,
}

impl<V> BracketTable<V> {
    /// Builds a table, validating that the brackets tile `[0, ∞)`.
    ///
    /// `name` is only used in error messages.
    ///
    /// # Example
    ///
    /// ```
    /// use statutory_engine::models::{BracketTable, TenureBracket};
    /// use rust_decimal::Decimal;
    ///
    /// let table = BracketTable::new(
    ///     "demo",
    ///     vec![
    ///         TenureBracket { min: Decimal::ZERO, max: Some(Decimal::ONE), value: 0u32 },
    ///         TenureBracket { min: Decimal::ONE, max: None, value: 2u32 },
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(table.value_for(Decimal::from(5)), Some(2));
    /// ```
    pub fn new(name: &str, brackets: Vec<TenureBracket<V>>) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidBracketTable {
            table: name.to_string(),
            message,
        };

        let first = brackets
            .first()
            .ok_or_else(|| invalid("table has no brackets".to_string()))?;
        if first.min != Decimal::ZERO {
            return Err(invalid(format!(
                "first bracket must start at 0, starts at {}",
                first.min
            )));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            match bracket.max {
                Some(max) if max <= bracket.min => {
                    return Err(invalid(format!(
                        "bracket {} is empty: [{}, {})",
                        index, bracket.min, max
                    )));
                }
                None if index != last_index => {
                    return Err(invalid(format!(
                        "only the last bracket may be unbounded, bracket {} is",
                        index
                    )));
                }
                Some(_) if index == last_index => {
                    return Err(invalid(
                        "last bracket must be unbounded to cover [0, ∞)".to_string(),
                    ));
                }
                _ => {}
            }
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            if pair[0].max != Some(pair[1].min) {
                return Err(invalid(format!(
                    "brackets {} and {} are not contiguous",
                    index,
                    index + 1
                )));
            }
        }

        Ok(Self { brackets })
    }

    /// Returns the bracket containing `x`, or `None` for negative values.
    pub fn lookup(&self, x: Decimal) -> Option<&TenureBracket<V>> {
        self.brackets.iter().find(|bracket| bracket.contains(x))
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[TenureBracket<V>] {
        &self.brackets
    }

    /// Returns the number of brackets.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl<V: Copy> BracketTable<V> {
    /// Returns the value of the bracket containing `x`.
    pub fn value_for(&self, x: Decimal) -> Option<V> {
        self.lookup(x).map(|bracket| bracket.value)
    }
}

impl BracketTable<Decimal> {
    /// Accumulates `x` across the bands, each portion at its band's rate.
    ///
    /// This is the tiered scheme used for progressive fee schedules: the
    /// first band's width is charged at the first rate, the next band's width
    /// at the next rate, and so on up to `x`.
    ///
    /// Returns `None` when the total leaves the decimal range.
    pub fn marginal_total(&self, x: Decimal) -> Option<Decimal> {
        if x <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        self.brackets
            .iter()
            .take_while(|bracket| bracket.min < x)
            .try_fold(Decimal::ZERO, |total, bracket| {
                let upper = bracket.max.map_or(x, |max| max.min(x));
                let portion = (upper - bracket.min).checked_mul(bracket.value)?;
                total.checked_add(portion)
            })
    }
}

impl<V: Serialize> Serialize for BracketTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.brackets.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for BracketTable<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let brackets = Vec::<TenureBracket<V>>::deserialize(deserializer)?;
        Self::new("bracket_table", brackets).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket<V>(min: &str, max: Option<&str>, value: V) -> TenureBracket<V> {
        TenureBracket {
            min: dec(min),
            max: max.map(dec),
            value,
        }
    }

    fn notice_table() -> BracketTable<u32> {
        BracketTable::new(
            "notice_weeks",
            vec![
                bracket("0", Some("0.5"), 0),
                bracket("0.5", Some("1.5"), 2),
                bracket("1.5", Some("3"), 4),
                bracket("3", Some("6"), 6),
                bracket("6", None, 8),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_lower_bound_is_inclusive() {
        let table = notice_table();
        assert_eq!(table.value_for(dec("0.5")), Some(2));
        assert_eq!(table.value_for(dec("1.5")), Some(4));
        assert_eq!(table.value_for(dec("3")), Some(6));
        assert_eq!(table.value_for(dec("6")), Some(8));
    }

    #[test]
    fn test_lookup_upper_bound_is_exclusive() {
        let table = notice_table();
        assert_eq!(table.value_for(dec("0.4999")), Some(0));
        assert_eq!(table.value_for(dec("2.9999")), Some(4));
    }

    #[test]
    fn test_lookup_open_ended_tail() {
        let table = notice_table();
        assert_eq!(table.value_for(dec("45")), Some(8));
    }

    #[test]
    fn test_lookup_negative_is_none() {
        let table = notice_table();
        assert_eq!(table.value_for(dec("-0.1")), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = BracketTable::<u32>::new("empty", vec![]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidBracketTable { table, .. }) if table == "empty"
        ));
    }

    #[test]
    fn test_table_not_starting_at_zero_rejected() {
        let result = BracketTable::new("t", vec![bracket("1", None, 1u32)]);
        match result {
            Err(EngineError::InvalidBracketTable { message, .. }) => {
                assert!(message.contains("start at 0"));
            }
            other => panic!("Expected InvalidBracketTable, got {:?}", other),
        }
    }

    #[test]
    fn test_gap_rejected() {
        let result = BracketTable::new(
            "t",
            vec![bracket("0", Some("1"), 0u32), bracket("2", None, 1u32)],
        );
        match result {
            Err(EngineError::InvalidBracketTable { message, .. }) => {
                assert!(message.contains("not contiguous"));
            }
            other => panic!("Expected InvalidBracketTable, got {:?}", other),
        }
    }

    #[test]
    fn test_overlap_rejected() {
        let result = BracketTable::new(
            "t",
            vec![bracket("0", Some("2"), 0u32), bracket("1", None, 1u32)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bounded_tail_rejected() {
        let result = BracketTable::new(
            "t",
            vec![bracket("0", Some("1"), 0u32), bracket("1", Some("5"), 1u32)],
        );
        match result {
            Err(EngineError::InvalidBracketTable { message, .. }) => {
                assert!(message.contains("unbounded"));
            }
            other => panic!("Expected InvalidBracketTable, got {:?}", other),
        }
    }

    #[test]
    fn test_unbounded_middle_bracket_rejected() {
        let result = BracketTable::new(
            "t",
            vec![bracket("0", None, 0u32), bracket("1", None, 1u32)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_band_rejected() {
        let result = BracketTable::new(
            "t",
            vec![bracket("0", Some("0"), 0u32), bracket("0", None, 1u32)],
        );
        match result {
            Err(EngineError::InvalidBracketTable { message, .. }) => {
                assert!(message.contains("empty"));
            }
            other => panic!("Expected InvalidBracketTable, got {:?}", other),
        }
    }

    #[test]
    fn test_marginal_total_accumulates_tiers() {
        let table = BracketTable::new(
            "attorney_fee",
            vec![
                bracket("0", Some("1000"), dec("0.16")),
                bracket("1000", Some("5000"), dec("0.15")),
                bracket("5000", None, dec("0.10")),
            ],
        )
        .unwrap();

        // 1000 * 0.16 + 4000 * 0.15 + 1000 * 0.10
        assert_eq!(table.marginal_total(dec("6000")), Some(dec("860")));
        assert_eq!(table.marginal_total(dec("500")), Some(dec("80")));
        assert_eq!(table.marginal_total(dec("1000")), Some(dec("160")));
        assert_eq!(table.marginal_total(Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn test_marginal_total_out_of_range_is_none() {
        let table = BracketTable::new(
            "multiplier",
            vec![
                bracket("0", Some("10"), dec("1")),
                bracket("10", None, dec("3")),
            ],
        )
        .unwrap();

        assert_eq!(table.marginal_total(Decimal::MAX), None);
    }

    #[test]
    fn test_deserialize_validates_table() {
        let yaml = r#"
- { min: "0", max: "1", value: 0 }
- { min: "1", value: 2 }
"#;
        let table: BracketTable<u32> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value_for(dec("7")), Some(2));

        let broken = r#"
- { min: "0", max: "1", value: 0 }
- { min: "3", value: 2 }
"#;
        let result: Result<BracketTable<u32>, _> = serde_yaml::from_str(broken);
        assert!(result.unwrap_err().to_string().contains("not contiguous"));
    }

    #[test]
    fn test_serialize_as_plain_list() {
        let table = notice_table();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[4]["value"], 8);
        assert!(json[4]["max"].is_null());
    }
}
