//! Plain-text report rendering for calculation results.
//!
//! A report is what the export step turns into a downloadable document:
//! a header, one `label: value` row per result field, any warnings, and the
//! advisory disclaimer. Every value is already a display string.

use std::fmt;

use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_date, format_money};
use crate::models::{CalculationResult, FieldKind, ResultField};

/// One rendered result field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Display label.
    pub label: String,
    /// Display value.
    pub value: String,
}

/// A result rendered for export.
///
/// # Example
///
/// ```
/// use statutory_engine::models::{
///     field_values, AuditTrace, CalculationResult, ResultField, ADVISORY_NOTICE,
/// };
/// use statutory_engine::report::CalculationReport;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let fields = vec![ResultField::money("notice_pay", Decimal::from(14000))];
/// let result = CalculationResult {
///     calculation_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     calculator_id: "notice_pay".to_string(),
///     title: "İhbar Tazminatı".to_string(),
///     constants_year: 2024,
///     values: field_values(&fields),
///     fields,
///     disclaimer: ADVISORY_NOTICE.to_string(),
///     audit_trace: AuditTrace { steps: vec![], warnings: vec![], duration_us: 0 },
/// };
///
/// let report = CalculationReport::new(&result, "İhbar Tazminatı", "İş Hukuku");
/// assert!(report.render_text().contains("İhbar Tazminatı: 14.000 ₺"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationReport {
    /// Report title.
    pub title: String,
    /// Report category.
    pub category: String,
    /// When the underlying calculation ran, in long form.
    pub generated_at: String,
    /// Year of the constants applied.
    pub constants_year: i32,
    /// One row per result field.
    pub rows: Vec<ReportRow>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Advisory disclaimer.
    pub disclaimer: String,
}

impl CalculationReport {
    /// Builds the report for `result`.
    pub fn new(result: &CalculationResult, title: &str, category: &str) -> Self {
        let generated_at = format_date(Some(result.timestamp.with_timezone(&Local).naive_local()));

        Self {
            title: title.to_string(),
            category: category.to_string(),
            generated_at,
            constants_year: result.constants_year,
            rows: result.fields.iter().map(render_row).collect(),
            warnings: result
                .audit_trace
                .warnings
                .iter()
                .map(|warning| warning.message.clone())
                .collect(),
            disclaimer: result.disclaimer.clone(),
        }
    }

    /// Renders the report as newline-separated text.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CalculationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Kategori: {}", self.category)?;
        writeln!(f, "Tarih: {}", self.generated_at)?;
        writeln!(f, "Mevzuat yılı: {}", self.constants_year)?;
        writeln!(f)?;

        for row in &self.rows {
            writeln!(f, "{}: {}", row.label, row.value)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Uyarılar:")?;
            for warning in &self.warnings {
                writeln!(f, "- {}", warning)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", self.disclaimer)
    }
}

/// Returns the display label for a result field, falling back to its name.
pub fn field_label(name: &str) -> &str {
    match name {
        "tenure_years" => "Kıdem Süresi",
        "annual_ceiling" => "Kıdem Tavanı",
        "gross_severance" => "Brüt Kıdem Tazminatı",
        "taxable_base" => "Vergi Matrahı",
        "income_tax" => "Gelir Vergisi",
        "stamp_duty" => "Damga Vergisi",
        "net_severance" => "Net Kıdem Tazminatı",
        "notice_weeks" => "İhbar Süresi (hafta)",
        "notice_days" => "İhbar Süresi (gün)",
        "notice_pay" => "İhbar Tazminatı",
        "child_support_rate" => "İştirak Nafakası Oranı",
        "child_support" => "İştirak Nafakası",
        "income_gap" => "Gelir Farkı",
        "spousal_support" => "Yoksulluk Nafakası",
        "total_support" => "Toplam Nafaka",
        "lookup_value" => "Dilim Değeri",
        "base_amount" => "Matrah",
        "bracket_value" => "Dilim Oranı / Tutarı",
        "total" => "Toplam",
        other => other,
    }
}

fn render_row(field: &ResultField) -> ReportRow {
    ReportRow {
        label: field_label(&field.name).to_string(),
        value: render_value(field.value, field.kind),
    }
}

fn render_value(value: Decimal, kind: FieldKind) -> String {
    match kind {
        FieldKind::Money => format_money(value),
        FieldKind::Rate => format!("%{}", (value * Decimal::ONE_HUNDRED).normalize()),
        FieldKind::Years => format!("{} yıl", value.round_dp(2).normalize()),
        FieldKind::Count | FieldKind::Number => value.normalize().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ADVISORY_NOTICE, AuditTrace, AuditWarning, OVER_DEDUCTION, field_values};
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_result(fields: Vec<ResultField>, warnings: Vec<AuditWarning>) -> CalculationResult {
        CalculationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            calculator_id: "severance".to_string(),
            title: "Kıdem Tazminatı".to_string(),
            constants_year: 2024,
            values: field_values(&fields),
            fields,
            disclaimer: ADVISORY_NOTICE.to_string(),
            audit_trace: AuditTrace {
                steps: vec![],
                warnings,
                duration_us: 0,
            },
        }
    }

    #[test]
    fn test_rows_follow_field_order_and_kind() {
        let result = create_result(
            vec![
                ResultField::new("tenure_years", dec("4.0000"), FieldKind::Years),
                ResultField::money("gross_severance", dec("80000")),
                ResultField::money("net_severance", dec("79392.80")),
            ],
            vec![],
        );

        let report = CalculationReport::new(&result, "Kıdem Tazminatı", "İş Hukuku");

        assert_eq!(
            report.rows,
            vec![
                ReportRow {
                    label: "Kıdem Süresi".to_string(),
                    value: "4 yıl".to_string()
                },
                ReportRow {
                    label: "Brüt Kıdem Tazminatı".to_string(),
                    value: "80.000 ₺".to_string()
                },
                ReportRow {
                    label: "Net Kıdem Tazminatı".to_string(),
                    value: "79.393 ₺".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_rate_and_count_rendering() {
        assert_eq!(render_value(dec("0.30"), FieldKind::Rate), "%30");
        assert_eq!(render_value(dec("0.06831"), FieldKind::Rate), "%6.831");
        assert_eq!(render_value(dec("8"), FieldKind::Count), "8");
        assert_eq!(render_value(dec("1.50"), FieldKind::Number), "1.5");
        assert_eq!(render_value(dec("2.3461"), FieldKind::Years), "2.35 yıl");
    }

    #[test]
    fn test_unknown_field_uses_its_name() {
        assert_eq!(field_label("custom_fee"), "custom_fee");
        assert_eq!(field_label("notice_pay"), "İhbar Tazminatı");
    }

    #[test]
    fn test_render_text_layout() {
        let result = create_result(vec![ResultField::money("total", dec("6831"))], vec![]);
        let text = CalculationReport::new(&result, "Dava Masrafları", "Harçlar").render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Dava Masrafları");
        assert_eq!(lines[1], "Kategori: Harçlar");
        assert!(lines[2].starts_with("Tarih: "));
        assert_eq!(lines[3], "Mevzuat yılı: 2024");
        assert!(lines.contains(&"Toplam: 6.831 ₺"));
        assert_eq!(lines.last(), Some(&ADVISORY_NOTICE));
        assert!(!text.contains("Uyarılar"));
    }

    #[test]
    fn test_warnings_are_listed() {
        let result = create_result(
            vec![ResultField::money("net_severance", Decimal::ZERO)],
            vec![AuditWarning {
                code: OVER_DEDUCTION.to_string(),
                message: "Deductions exceed gross; net clamped to zero".to_string(),
                severity: "medium".to_string(),
            }],
        );

        let text = CalculationReport::new(&result, "Kıdem Tazminatı", "İş Hukuku").render_text();

        assert!(text.contains("Uyarılar:\n- Deductions exceed gross; net clamped to zero"));
    }
}
