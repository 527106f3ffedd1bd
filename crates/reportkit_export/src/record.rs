//! Record capability used in place of runtime member reflection.
//!
//! Every exportable record type describes itself as an ordered list of
//! `(field name, value)` pairs. The bundle stores records type-erased behind
//! [`ExportRecord`], so datasets of different concrete types can live side by
//! side.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

////////////////////////////////////////////////////////////////////////////////
// #region FieldValue

/// Source value of one record field, before renderer-specific normalization.
#[derive(Clone)]
pub enum EnumFieldValue {
    /// Absent value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Wall-clock date-time.
    DateTime(NaiveDateTime),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text, including enum-like labels.
    Text(String),
    /// Value without a defined conversion; rendered through `Display`.
    Opaque(Arc<dyn fmt::Display + Send + Sync>),
}

impl EnumFieldValue {
    /// Wrap a value that has no dedicated conversion rule.
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::Opaque(Arc::new(value))
    }

    /// `true` for [`EnumFieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for EnumFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(val) => f.debug_tuple("Bool").field(val).finish(),
            Self::DateTime(val) => f.debug_tuple("DateTime").field(val).finish(),
            Self::Integer(val) => f.debug_tuple("Integer").field(val).finish(),
            Self::Float(val) => f.debug_tuple("Float").field(val).finish(),
            Self::Text(val) => f.debug_tuple("Text").field(val).finish(),
            Self::Opaque(val) => f.debug_tuple("Opaque").field(&val.to_string()).finish(),
        }
    }
}

impl PartialEq for EnumFieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Conversion of plain Rust field types into [`EnumFieldValue`].
pub trait ToFieldValue {
    /// Produce the source value of this field.
    fn to_field_value(&self) -> EnumFieldValue;
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> EnumFieldValue {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> EnumFieldValue {
        match self {
            Some(val) => val.to_field_value(),
            None => EnumFieldValue::Null,
        }
    }
}

impl ToFieldValue for EnumFieldValue {
    fn to_field_value(&self) -> EnumFieldValue {
        self.clone()
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::Bool(*self)
    }
}

macro_rules! impl_to_field_value_integer {
    ($($ty:ty),+) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> EnumFieldValue {
                    EnumFieldValue::Integer(i64::from(*self))
                }
            }
        )+
    };
}

impl_to_field_value_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_to_field_value_wide_integer {
    ($($ty:ty),+) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> EnumFieldValue {
                    match i64::try_from(*self) {
                        Ok(val) => EnumFieldValue::Integer(val),
                        Err(_) => EnumFieldValue::Text(self.to_string()),
                    }
                }
            }
        )+
    };
}

impl_to_field_value_wide_integer!(u64, usize, isize, i128, u128);

/// Finite values keep their own shortest text (`0.1f32` renders `"0.1"`);
/// non-finite values share the float spellings.
impl ToFieldValue for f32 {
    fn to_field_value(&self) -> EnumFieldValue {
        if self.is_finite() {
            EnumFieldValue::Text(self.to_string())
        } else {
            EnumFieldValue::Float(f64::from(*self))
        }
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::Float(*self)
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::Text(self.to_string())
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::Text(self.clone())
    }
}

impl ToFieldValue for char {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::Text(self.to_string())
    }
}

impl ToFieldValue for NaiveDateTime {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::DateTime(*self)
    }
}

impl ToFieldValue for NaiveDate {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::DateTime(NaiveDateTime::new(*self, NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> ToFieldValue for DateTime<Tz> {
    fn to_field_value(&self) -> EnumFieldValue {
        EnumFieldValue::DateTime(self.naive_local())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordCapability

/// Ordered `(field name, value)` view of one record.
///
/// The field order returned for the first record of a dataset becomes the
/// column order of the whole dataset.
pub trait ExportRecord: Send + Sync {
    /// Fields in declaration order.
    fn fields(&self) -> Vec<(Cow<'_, str>, EnumFieldValue)>;
}

impl<T: ExportRecord + ?Sized> ExportRecord for Box<T> {
    fn fields(&self) -> Vec<(Cow<'_, str>, EnumFieldValue)> {
        (**self).fields()
    }
}

impl<T: ExportRecord + ?Sized> ExportRecord for Arc<T> {
    fn fields(&self) -> Vec<(Cow<'_, str>, EnumFieldValue)> {
        (**self).fields()
    }
}

/// Ad-hoc record with caller-defined field order.
///
/// Useful for projections and summary rows that have no named type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordRow {
    l_fields: Vec<(String, EnumFieldValue)>,
}

impl RecordRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl ToFieldValue) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToFieldValue) {
        self.l_fields.push((name.into(), value.to_field_value()));
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.l_fields.len()
    }

    /// `true` when the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.l_fields.is_empty()
    }
}

impl ExportRecord for RecordRow {
    fn fields(&self) -> Vec<(Cow<'_, str>, EnumFieldValue)> {
        self.l_fields
            .iter()
            .map(|(name, value)| (Cow::Borrowed(name.as_str()), value.clone()))
            .collect()
    }
}

/// Implement [`ExportRecord`] for a plain struct.
///
/// Fields are exported in the listed order. Either list field idents (the
/// ident becomes the column name) or `"Column" => field` pairs.
///
/// ```
/// use reportkit_export::export_record;
///
/// struct ApplicantRow {
///     application_id: i64,
///     applicant_name: Option<String>,
/// }
///
/// export_record!(ApplicantRow {
///     "ApplicationId" => application_id,
///     "ApplicantName" => applicant_name,
/// });
/// ```
#[macro_export]
macro_rules! export_record {
    ($ty:ty { $($name:literal => $field:ident),+ $(,)? }) => {
        impl $crate::record::ExportRecord for $ty {
            fn fields(
                &self,
            ) -> ::std::vec::Vec<(::std::borrow::Cow<'_, str>, $crate::record::EnumFieldValue)> {
                ::std::vec![$(
                    (
                        ::std::borrow::Cow::Borrowed($name),
                        $crate::record::ToFieldValue::to_field_value(&self.$field),
                    )
                ),+]
            }
        }
    };
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::record::ExportRecord for $ty {
            fn fields(
                &self,
            ) -> ::std::vec::Vec<(::std::borrow::Cow<'_, str>, $crate::record::EnumFieldValue)> {
                ::std::vec![$(
                    (
                        ::std::borrow::Cow::Borrowed(::std::stringify!($field)),
                        $crate::record::ToFieldValue::to_field_value(&self.$field),
                    )
                ),+]
            }
        }
    };
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    struct JobRow {
        title: String,
        is_active: bool,
        salary: Option<f64>,
    }

    crate::export_record!(JobRow {
        "Title" => title,
        "IsActive" => is_active,
        "Salary" => salary,
    });

    struct CategoryRow {
        id: u32,
        name: &'static str,
    }

    crate::export_record!(CategoryRow { id, name });

    #[test]
    fn macro_keeps_declared_order_and_names() {
        let row = JobRow {
            title: "Backend Engineer".to_string(),
            is_active: true,
            salary: None,
        };
        let l_fields = row.fields();
        let l_names: Vec<&str> = l_fields.iter().map(|(name, _)| name.as_ref()).collect();
        assert_eq!(l_names, vec!["Title", "IsActive", "Salary"]);
        assert_eq!(l_fields[1].1, EnumFieldValue::Bool(true));
        assert!(l_fields[2].1.is_null());
    }

    #[test]
    fn macro_ident_form_uses_field_idents() {
        let row = CategoryRow { id: 7, name: "IT" };
        let l_fields = row.fields();
        assert_eq!(l_fields[0].0, "id");
        assert_eq!(l_fields[0].1, EnumFieldValue::Integer(7));
        assert_eq!(l_fields[1].1, EnumFieldValue::Text("IT".to_string()));
    }

    #[test]
    fn wide_integers_fall_back_to_text_when_out_of_range() {
        assert_eq!(u64::MAX.to_field_value(), EnumFieldValue::Text(u64::MAX.to_string()));
        assert_eq!(42u64.to_field_value(), EnumFieldValue::Integer(42));
    }

    #[test]
    fn dates_become_midnight_date_times() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 14).expect("valid date");
        let EnumFieldValue::DateTime(dt) = date.to_field_value() else {
            panic!("expected date-time");
        };
        assert_eq!(dt.to_string(), "2025-10-14 00:00:00");
    }

    #[test]
    fn record_row_builder_preserves_push_order() {
        let row = RecordRow::new()
            .with("TotalApplicants", 3)
            .with("Accepted", 1usize);
        assert_eq!(row.len(), 2);
        let l_fields = row.fields();
        assert_eq!(l_fields[0].0, "TotalApplicants");
        assert_eq!(l_fields[1].1, EnumFieldValue::Integer(1));
    }

    #[test]
    fn opaque_values_compare_by_rendered_text() {
        assert_eq!(
            EnumFieldValue::opaque("x".to_string()),
            EnumFieldValue::opaque("x")
        );
        assert_eq!(format!("{:?}", EnumFieldValue::opaque(1.5)), "Opaque(\"1.5\")");
    }
}
