//! Field value normalization for the two renderer families.
//!
//! Both rule sets dispatch on [`EnumFieldValue`] the same way and diverge only
//! in the target domain: the workbook keeps native booleans and date-times,
//! the flowing document renders everything to fixed, locale-independent text.

use chrono::NaiveDateTime;

use crate::conf::{C_FMT_DATETIME_TEXT, C_TEXT_FALSE, C_TEXT_TRUE};
use crate::record::EnumFieldValue;

/// Normalized workbook cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumGridCellValue {
    /// Text cell (also used for null, written as an empty string).
    Text(String),
    /// Native boolean cell.
    Bool(bool),
    /// Native date-time cell.
    DateTime(NaiveDateTime),
}

/// Typed path. `None` stands for a field missing from the record.
pub fn normalize_grid_value(value: Option<&EnumFieldValue>) -> EnumGridCellValue {
    let Some(value) = value else {
        return EnumGridCellValue::Text(String::new());
    };
    match value {
        EnumFieldValue::Null => EnumGridCellValue::Text(String::new()),
        EnumFieldValue::Bool(val) => EnumGridCellValue::Bool(*val),
        EnumFieldValue::DateTime(val) => EnumGridCellValue::DateTime(*val),
        EnumFieldValue::Integer(val) => EnumGridCellValue::Text(val.to_string()),
        EnumFieldValue::Float(val) => EnumGridCellValue::Text(convert_float_to_str(*val)),
        EnumFieldValue::Text(val) => EnumGridCellValue::Text(val.clone()),
        EnumFieldValue::Opaque(val) => EnumGridCellValue::Text(val.to_string()),
    }
}

/// Text-only path. `None` stands for a field missing from the record.
pub fn normalize_text_value(value: Option<&EnumFieldValue>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match value {
        EnumFieldValue::Null => String::new(),
        EnumFieldValue::Bool(true) => C_TEXT_TRUE.to_string(),
        EnumFieldValue::Bool(false) => C_TEXT_FALSE.to_string(),
        EnumFieldValue::DateTime(val) => val.format(C_FMT_DATETIME_TEXT).to_string(),
        EnumFieldValue::Integer(val) => val.to_string(),
        EnumFieldValue::Float(val) => convert_float_to_str(*val),
        EnumFieldValue::Text(val) => val.clone(),
        EnumFieldValue::Opaque(val) => val.to_string(),
    }
}

/// Culture-invariant float text; non-finite values use fixed spellings.
fn convert_float_to_str(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    x.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::ToFieldValue;

    fn sample_dt() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 14)
            .and_then(|d| d.and_hms_opt(23, 30, 48))
            .expect("valid date-time")
    }

    #[test]
    fn null_and_missing_render_empty_in_both_paths() {
        assert_eq!(
            normalize_grid_value(Some(&EnumFieldValue::Null)),
            EnumGridCellValue::Text(String::new())
        );
        assert_eq!(normalize_grid_value(None), EnumGridCellValue::Text(String::new()));
        assert_eq!(normalize_text_value(Some(&EnumFieldValue::Null)), "");
        assert_eq!(normalize_text_value(None), "");
    }

    #[test]
    fn booleans_stay_native_in_grid_and_become_yes_no_in_text() {
        let value = EnumFieldValue::Bool(true);
        assert_eq!(normalize_grid_value(Some(&value)), EnumGridCellValue::Bool(true));
        assert_eq!(normalize_text_value(Some(&value)), "Yes");
        assert_eq!(normalize_text_value(Some(&EnumFieldValue::Bool(false))), "No");
    }

    #[test]
    fn date_times_stay_native_in_grid_and_use_fixed_text_pattern() {
        let value = EnumFieldValue::DateTime(sample_dt());
        assert_eq!(
            normalize_grid_value(Some(&value)),
            EnumGridCellValue::DateTime(sample_dt())
        );
        assert_eq!(normalize_text_value(Some(&value)), "2025-10-14 23:30");
    }

    #[test]
    fn scalars_become_invariant_strings() {
        assert_eq!(
            normalize_grid_value(Some(&EnumFieldValue::Integer(-12))),
            EnumGridCellValue::Text("-12".to_string())
        );
        assert_eq!(normalize_text_value(Some(&EnumFieldValue::Float(1234.5))), "1234.5");
        assert_eq!(normalize_text_value(Some(&EnumFieldValue::Float(f64::NAN))), "NaN");
        assert_eq!(
            normalize_text_value(Some(&EnumFieldValue::Text("Accepted".to_string()))),
            "Accepted"
        );
    }

    #[test]
    fn single_precision_floats_keep_their_own_digits() {
        let value = 0.1f32.to_field_value();
        assert_eq!(normalize_text_value(Some(&value)), "0.1");
        assert_eq!(
            normalize_grid_value(Some(&value)),
            EnumGridCellValue::Text("0.1".to_string())
        );
        assert_eq!(normalize_text_value(Some(&(-2.5f32).to_field_value())), "-2.5");
        assert_eq!(normalize_text_value(Some(&f32::NAN.to_field_value())), "NaN");
        assert_eq!(
            normalize_text_value(Some(&f32::NEG_INFINITY.to_field_value())),
            "-Infinity"
        );
    }

    #[test]
    fn opaque_values_fall_back_to_display_text() {
        let value = EnumFieldValue::opaque(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(
            normalize_grid_value(Some(&value)),
            EnumGridCellValue::Text("127.0.0.1".to_string())
        );
        assert_eq!(normalize_text_value(Some(&value)), "127.0.0.1");
    }
}
