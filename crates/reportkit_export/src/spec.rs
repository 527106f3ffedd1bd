//! Shared export specification models, options and errors.

use thiserror::Error;

use crate::conf::{N_PT_A4_LONG, N_PT_A4_SHORT};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Workbook cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,
    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
    /// Font color (`#RRGGBB`).
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookOptions

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells only.
    Header,
    /// Infer width from body cells only.
    Body,
    /// Infer width from both header and body cells (default).
    #[default]
    All,
}

/// Autofit policy applied once every row of a sheet is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Max body rows inspected when body-based inference is active.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::All,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: 80,
            width_cell_padding: 2,
        }
    }
}

/// Workbook exporter options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxExportOptions {
    /// Format for text/boolean body cells.
    pub fmt_text: SpecCellFormat,
    /// Format for native date-time body cells.
    pub fmt_datetime: SpecCellFormat,
    /// Format for the header row.
    pub fmt_header: SpecCellFormat,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Freeze the header row.
    pub if_freeze_header: bool,
    /// Replacement for characters that are illegal in sheet names.
    pub sheet_name_replace_to: String,
}

impl Default for SpecXlsxExportOptions {
    fn default() -> Self {
        let dict_fmt = crate::conf::derive_default_xlsx_formats();
        Self {
            fmt_text: dict_fmt.get("text").cloned().unwrap_or_default(),
            fmt_datetime: dict_fmt.get("datetime").cloned().unwrap_or_default(),
            fmt_header: dict_fmt.get("header").cloned().unwrap_or_default(),
            policy_autofit: SpecAutofitCellsPolicy::default(),
            if_freeze_header: true,
            sheet_name_replace_to: "_".to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PdfLayout

/// Page geometry, fonts and table styling of the flowing-document exporter.
///
/// Lengths are PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPdfLayout {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Margin on every side.
    pub margin: f32,
    /// Heading font size.
    pub size_heading: f32,
    /// Vertical gap after a heading.
    pub spacing_heading_after: f32,
    /// Font size of the placeholder paragraph.
    pub size_placeholder: f32,
    /// Font size of table header cells.
    pub size_table_header: f32,
    /// Font size of table body cells.
    pub size_table_body: f32,
    /// Line height as a multiple of font size.
    pub line_leading: f32,
    /// Inner padding of header cells.
    pub padding_header: f32,
    /// Inner padding of body cells.
    pub padding_body: f32,
    /// Gray level (0 black .. 1 white) of header cell shading.
    pub shade_header_gray: f32,
    /// Stroke width of cell borders.
    pub border_width: f32,
}

impl Default for SpecPdfLayout {
    fn default() -> Self {
        Self {
            page_width: N_PT_A4_LONG,
            page_height: N_PT_A4_SHORT,
            margin: 20.0,
            size_heading: 14.0,
            spacing_heading_after: 8.0,
            size_placeholder: 12.0,
            size_table_header: 10.0,
            size_table_body: 10.0,
            line_leading: 1.2,
            padding_header: 5.0,
            padding_body: 4.0,
            shade_header_gray: 0.827,
            border_width: 0.5,
        }
    }
}

impl SpecPdfLayout {
    /// Usable width between the side margins.
    pub fn width_content(&self) -> f32 {
        (self.page_width - 2.0 * self.margin).max(1.0)
    }

    /// Usable height between the top and bottom margins.
    pub fn height_content(&self) -> f32 {
        (self.page_height - 2.0 * self.margin).max(1.0)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetSpecification

/// Concrete sheet part emitted to workbook (after Excel-limit slicing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    /// Sheet name before uniqueness resolution.
    pub sheet_name: String,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
    /// Inclusive source column start.
    pub col_start_inclusive: usize,
    /// Exclusive source column end.
    pub col_end_exclusive: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// One rendered section (sheet or PDF section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportSection {
    /// Dataset name as supplied in the bundle.
    pub dataset_name: String,
    /// Rendered section name (sanitized sheet name or heading text).
    pub section_name: String,
    /// Number of body rows rendered.
    pub n_rows: usize,
    /// Number of columns rendered.
    pub n_cols: usize,
}

/// Per-export call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecExportReport {
    /// Sections in render order.
    pub sections: Vec<SpecExportSection>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecExportReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Section names in render order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.section_name.as_str())
            .collect()
    }
}

/// Rendered document bytes plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportOutput {
    /// Complete document bytes.
    pub bytes: Vec<u8>,
    /// Diagnostics collected while rendering.
    pub report: SpecExportReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Export call failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Format token outside `{excel, xlsx, pdf}`.
    #[error("unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    /// Workbook backend failure.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// PDF backend failure.
    #[error("pdf write error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Row/column index beyond worksheet addressing range.
    #[error("sheet limit exceeded: {0}")]
    SheetLimit(String),

    /// Exporter options that cannot produce a document.
    #[error("invalid export options: {0}")]
    InvalidOptions(String),
}

impl ExportError {
    /// Every failure is deterministic for a given bundle and token.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_format_merge_prefers_right_side() {
        let base = SpecCellFormat {
            font_name: Some("Calibri".to_string()),
            bold: Some(false),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            bold: Some(true),
            num_format: Some("0".to_string()),
            ..Default::default()
        });
        assert_eq!(merged.font_name.as_deref(), Some("Calibri"));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.num_format.as_deref(), Some("0"));
    }

    #[test]
    fn default_layout_is_a4_landscape() {
        let layout = SpecPdfLayout::default();
        assert!(layout.page_width > layout.page_height);
        assert_eq!(layout.width_content(), 802.0);
        assert_eq!(layout.height_content(), 555.0);
    }

    #[test]
    fn unsupported_format_names_token_and_is_permanent() {
        let err = ExportError::UnsupportedFormat("csv".to_string());
        assert_eq!(err.to_string(), "unsupported export format: \"csv\"");
        assert!(!err.is_retryable());
    }
}
