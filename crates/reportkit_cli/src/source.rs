//! JSON input loading.
//!
//! Input is one JSON object: keys are dataset names (file order is kept),
//! values are arrays of flat JSON objects or `null` for an empty dataset.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime};
use reportkit_export::{EnumFieldValue, RecordRow, ReportBundle, ToFieldValue};
use serde_json::{Map, Value};

/// ISO-8601 date-time layouts accepted without an offset.
const TUP_FMT_DATETIME_NAIVE: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Read and parse a bundle file.
pub fn read_bundle_file(path: &Path) -> Result<ReportBundle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input {}", path.display()))?;
    parse_bundle_json(&text).with_context(|| format!("invalid input {}", path.display()))
}

/// Parse bundle JSON text.
pub fn parse_bundle_json(text: &str) -> Result<ReportBundle> {
    let root: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    let Value::Object(dict_datasets) = root else {
        bail!("input must be a JSON object mapping dataset names to record arrays");
    };

    let mut bundle = ReportBundle::new();
    for (c_dataset_name, value) in &dict_datasets {
        let l_rows = match value {
            Value::Null => Vec::new(),
            Value::Array(l_items) => l_items
                .iter()
                .enumerate()
                .map(|(n_idx, item)| match item {
                    Value::Object(obj) => Ok(convert_json_object_to_row(obj)),
                    other => bail!(
                        "dataset {c_dataset_name:?}: record {n_idx} must be a JSON object, got {}",
                        describe_json_kind(other)
                    ),
                })
                .collect::<Result<Vec<_>>>()?,
            other => bail!(
                "dataset {c_dataset_name:?} must be an array of records or null, got {}",
                describe_json_kind(other)
            ),
        };
        tracing::debug!(dataset = %c_dataset_name, n_records = l_rows.len(), "dataset loaded");
        bundle.add(c_dataset_name.as_str(), l_rows);
    }
    Ok(bundle)
}

/// One JSON object as a record; key order becomes field order.
pub fn convert_json_object_to_row(obj: &Map<String, Value>) -> RecordRow {
    let mut row = RecordRow::new();
    for (c_name, value) in obj {
        row.push(c_name.as_str(), convert_json_value(value));
    }
    row
}

/// Map a JSON value onto the record value model.
pub fn convert_json_value(value: &Value) -> EnumFieldValue {
    match value {
        Value::Null => EnumFieldValue::Null,
        Value::Bool(val) => EnumFieldValue::Bool(*val),
        Value::Number(num) => {
            if let Some(val) = num.as_i64() {
                EnumFieldValue::Integer(val)
            } else if let Some(val) = num.as_u64() {
                val.to_field_value()
            } else {
                num.as_f64()
                    .map(EnumFieldValue::Float)
                    .unwrap_or_else(|| EnumFieldValue::Text(num.to_string()))
            }
        }
        Value::String(val) => match parse_datetime_text(val) {
            Some(dt) => EnumFieldValue::DateTime(dt),
            None => EnumFieldValue::Text(val.clone()),
        },
        Value::Array(_) | Value::Object(_) => EnumFieldValue::opaque(value.clone()),
    }
}

/// Parse ISO-8601 date-time text; offsets keep their local wall-clock time.
fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    TUP_FMT_DATETIME_NAIVE
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn describe_json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use reportkit_export::ExportRecord;
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_map_to_field_values() {
        assert_eq!(convert_json_value(&json!(null)), EnumFieldValue::Null);
        assert_eq!(convert_json_value(&json!(true)), EnumFieldValue::Bool(true));
        assert_eq!(convert_json_value(&json!(42)), EnumFieldValue::Integer(42));
        assert_eq!(convert_json_value(&json!(1.5)), EnumFieldValue::Float(1.5));
        assert_eq!(
            convert_json_value(&json!(u64::MAX)),
            EnumFieldValue::Text(u64::MAX.to_string())
        );
        assert_eq!(
            convert_json_value(&json!("Pending")),
            EnumFieldValue::Text("Pending".to_string())
        );
    }

    #[test]
    fn iso_strings_become_date_times() {
        let dt = NaiveDate::from_ymd_opt(2025, 10, 14)
            .and_then(|d| d.and_hms_opt(23, 30, 0))
            .expect("valid date-time");
        assert_eq!(
            convert_json_value(&json!("2025-10-14T23:30:00")),
            EnumFieldValue::DateTime(dt)
        );
        assert_eq!(
            convert_json_value(&json!("2025-10-14T23:30:00+02:00")),
            EnumFieldValue::DateTime(dt)
        );
        assert_eq!(
            convert_json_value(&json!("2025-10-14 23:30")),
            EnumFieldValue::DateTime(dt)
        );
        assert_eq!(
            convert_json_value(&json!("2025-10-14")),
            EnumFieldValue::Text("2025-10-14".to_string())
        );
    }

    #[test]
    fn nested_values_render_as_compact_json() {
        match convert_json_value(&json!({"a": [1, 2]})) {
            EnumFieldValue::Opaque(val) => assert_eq!(val.to_string(), "{\"a\":[1,2]}"),
            other => panic!("expected opaque value, got {other:?}"),
        }
    }

    #[test]
    fn bundle_keeps_dataset_and_field_order() {
        let bundle = parse_bundle_json(
            r#"{"Summary": [{"Total": 2, "Accepted": 1}], "Applicants": null, "Jobs": []}"#,
        )
        .expect("valid input");

        assert_eq!(bundle.names(), vec!["Summary", "Applicants", "Jobs"]);
        let l_records = bundle.get("Summary").expect("summary dataset");
        let l_names: Vec<String> = l_records[0]
            .fields()
            .into_iter()
            .map(|(name, _)| name.into_owned())
            .collect();
        assert_eq!(l_names, vec!["Total", "Accepted"]);
        assert_eq!(bundle.get("Applicants").map(<[_]>::len), Some(0));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(parse_bundle_json("[1, 2]").is_err());
        assert!(parse_bundle_json(r#"{"A": 5}"#).is_err());

        let err = parse_bundle_json(r#"{"A": [1]}"#).expect_err("record must be an object");
        assert!(err.to_string().contains("record 0"));
    }
}
