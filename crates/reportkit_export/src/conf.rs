//! Export constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::{SpecCellFormat, SpecPdfLayout, SpecXlsxExportOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Max characters in one worksheet cell.
pub const N_LEN_EXCEL_CELL_TEXT_MAX: usize = 32_767;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['/', '\\', '?', '*', '[', ']', ':'];
/// Sheet name used when a dataset name sanitizes to nothing.
pub const C_SHEET_NAME_FALLBACK: &str = "Sheet1";

/// Default dataset title for single-collection workbook exports.
pub const C_TITLE_DEFAULT_XLSX: &str = "Sheet1";
/// Default dataset title for single-collection PDF exports.
pub const C_TITLE_DEFAULT_PDF: &str = "Report";

/// Placeholder paragraph for sections without records.
pub const C_TEXT_NO_DATA: &str = "(No data)";
/// Text rendering of boolean `true`.
pub const C_TEXT_TRUE: &str = "Yes";
/// Text rendering of boolean `false`.
pub const C_TEXT_FALSE: &str = "No";
/// `chrono` pattern for date-time values in text output.
pub const C_FMT_DATETIME_TEXT: &str = "%Y-%m-%d %H:%M";
/// Excel number format for native date-time cells.
pub const C_NUM_FORMAT_DATETIME: &str = "yyyy-mm-dd hh:mm";

/// A4 long edge in points.
pub const N_PT_A4_LONG: f32 = 842.0;
/// A4 short edge in points.
pub const N_PT_A4_SHORT: f32 = 595.0;

/// Content type of workbook output.
pub const C_CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Content type of PDF output.
pub const C_CONTENT_TYPE_PDF: &str = "application/pdf";

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFmtKey {
    /// Generic text cell format.
    Text,
    /// Native date-time cell format.
    DateTime,
    /// Header cell format.
    Header,
}

impl EnumFmtKey {
    /// Preset map key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::DateTime => "datetime",
            Self::Header => "header",
        }
    }
}

/// Build default named format presets used by [`crate::xlsx::XlsxReportExporter`].
pub fn derive_default_xlsx_formats() -> BTreeMap<String, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat::default();

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(EnumFmtKey::Text.as_str().to_string(), cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        EnumFmtKey::Header.as_str().to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::DateTime.as_str().to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATETIME.to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}

/// Build default workbook export options.
pub fn derive_default_xlsx_export_options() -> SpecXlsxExportOptions {
    SpecXlsxExportOptions::default()
}

/// Build default PDF page layout (A4 landscape, 20pt margins).
pub fn derive_default_pdf_layout() -> SpecPdfLayout {
    SpecPdfLayout::default()
}
