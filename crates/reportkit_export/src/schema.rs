//! Column discovery from the first record of a dataset.

use std::collections::{BTreeMap, BTreeSet};

use crate::bundle::BoxedRecord;
use crate::record::{EnumFieldValue, ExportRecord};

/// Ordered field list of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSchema {
    /// Field names in column order.
    pub fields: Vec<String>,
}

impl SpecSchema {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

/// Values of one record aligned to a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecAlignedRow {
    /// One entry per schema field; `None` when the record lacks the field.
    pub values: Vec<Option<EnumFieldValue>>,
    /// Count of schema fields the record did not provide.
    pub n_missing: usize,
}

/// Derive the schema from the first record; `None` for an empty dataset.
pub fn discover_schema(records: &[BoxedRecord]) -> Option<SpecSchema> {
    let first = records.first()?;
    let fields = first
        .fields()
        .into_iter()
        .map(|(name, _)| name.into_owned())
        .collect();
    Some(SpecSchema { fields })
}

/// Extract `record` values in schema order.
///
/// Matching is positional while names agree and falls back to a by-name
/// lookup otherwise. Fields beyond the schema are ignored.
pub fn derive_row_values(schema: &SpecSchema, record: &dyn ExportRecord) -> SpecAlignedRow {
    let mut l_fields = record.fields();
    let mut values = Vec::with_capacity(schema.width());
    let mut n_missing = 0usize;

    for (n_idx_col, c_name) in schema.fields.iter().enumerate() {
        let n_idx_found = match l_fields.get(n_idx_col) {
            Some((name, _)) if name == c_name.as_str() => Some(n_idx_col),
            _ => l_fields.iter().position(|(name, _)| name == c_name.as_str()),
        };
        match n_idx_found {
            Some(n_idx) => {
                let value = std::mem::replace(&mut l_fields[n_idx].1, EnumFieldValue::Null);
                values.push(Some(value));
            }
            None => {
                n_missing += 1;
                values.push(None);
            }
        }
    }

    SpecAlignedRow { values, n_missing }
}

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), String> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_name, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_name:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(format!("Duplicate column names detected: {c_msg}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordRow;

    fn boxed(rows: Vec<RecordRow>) -> Vec<BoxedRecord> {
        rows.into_iter()
            .map(|row| Box::new(row) as BoxedRecord)
            .collect()
    }

    #[test]
    fn empty_dataset_has_no_schema() {
        assert_eq!(discover_schema(&[]), None);
    }

    #[test]
    fn schema_comes_from_first_record_only() {
        let records = boxed(vec![
            RecordRow::new().with("Id", 1).with("Name", "a"),
            RecordRow::new()
                .with("Id", 2)
                .with("Name", "b")
                .with("Extra", true),
        ]);
        let schema = discover_schema(&records).expect("schema");
        assert_eq!(schema.fields, vec!["Id", "Name"]);
    }

    #[test]
    fn later_record_missing_a_field_yields_none_cell() {
        let schema = SpecSchema {
            fields: vec!["Id".to_string(), "Name".to_string()],
        };
        let record = RecordRow::new().with("Id", 5);
        let row = derive_row_values(&schema, &record);
        assert_eq!(row.values, vec![Some(EnumFieldValue::Integer(5)), None]);
        assert_eq!(row.n_missing, 1);
    }

    #[test]
    fn reordered_fields_are_matched_by_name() {
        let schema = SpecSchema {
            fields: vec!["Id".to_string(), "Name".to_string()],
        };
        let record = RecordRow::new().with("Name", "x").with("Id", 9);
        let row = derive_row_values(&schema, &record);
        assert_eq!(
            row.values,
            vec![
                Some(EnumFieldValue::Integer(9)),
                Some(EnumFieldValue::Text("x".to_string()))
            ]
        );
        assert_eq!(row.n_missing, 0);
    }

    #[test]
    fn duplicate_columns_are_reported_with_positions() {
        let columns = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        let err = validate_unique_columns(&columns).expect_err("duplicates");
        assert_eq!(
            err,
            "Duplicate column names detected: \"A\" x2 at indices [0, 2]"
        );
    }
}
