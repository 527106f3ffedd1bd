//! Grid exporter: one worksheet per dataset with typed cells.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::bundle::{BoxedRecord, ReportBundle};
use crate::conf::{
    C_FMT_DATETIME_TEXT, C_NUM_FORMAT_DATETIME, C_TITLE_DEFAULT_XLSX, N_LEN_EXCEL_CELL_TEXT_MAX,
};
use crate::dispatch::{EnumExportFormat, ReportExporter};
use crate::normalize::{EnumGridCellValue, normalize_grid_value};
use crate::schema::{derive_row_values, discover_schema, validate_unique_columns};
use crate::spec::{
    EnumAutofitColumnsRule, ExportError, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecExportOutput, SpecExportReport, SpecExportSection, SpecSheetSlice, SpecXlsxExportOptions,
};
use crate::util::{
    derive_unique_sheet_name, estimate_unicode_string_width, plan_sheet_slices,
    sanitize_sheet_name,
};

/// Workbook exporter.
///
/// Holds only options; every call builds its own workbook, so one exporter
/// can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct XlsxReportExporter {
    options: SpecXlsxExportOptions,
}

struct SpecWorkbookContext {
    workbook: Workbook,
    fmt_header: Format,
    fmt_text: Format,
    fmt_datetime: Format,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecExportReport,
}

impl XlsxReportExporter {
    /// Create exporter with explicit options.
    pub fn new(options: SpecXlsxExportOptions) -> Self {
        Self { options }
    }

    /// Exporter options.
    pub fn options(&self) -> &SpecXlsxExportOptions {
        &self.options
    }

    fn write_bundle(&self, bundle: &ReportBundle) -> Result<SpecExportOutput, ExportError> {
        validate_policy_autofit(&self.options.policy_autofit)?;

        let mut cfg_fmt_datetime = self.options.fmt_datetime.clone();
        cfg_fmt_datetime
            .num_format
            .get_or_insert_with(|| C_NUM_FORMAT_DATETIME.to_string());

        let mut ctx = SpecWorkbookContext {
            workbook: Workbook::new(),
            fmt_header: derive_rust_xlsx_format(&self.options.fmt_header),
            fmt_text: derive_rust_xlsx_format(&self.options.fmt_text),
            fmt_datetime: derive_rust_xlsx_format(&cfg_fmt_datetime),
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecExportReport::default(),
        };

        for (c_dataset_name, records) in bundle.get_all() {
            self.write_dataset(&mut ctx, c_dataset_name, records)?;
        }

        let bytes = ctx.workbook.save_to_buffer()?;
        tracing::info!(
            n_sheets = ctx.report.sections.len(),
            n_warnings = ctx.report.warnings.len(),
            n_bytes = bytes.len(),
            "workbook export finished"
        );
        Ok(SpecExportOutput {
            bytes,
            report: ctx.report,
        })
    }

    fn write_dataset(
        &self,
        ctx: &mut SpecWorkbookContext,
        dataset_name: &str,
        records: &[BoxedRecord],
    ) -> Result<(), ExportError> {
        let c_sheet_name = sanitize_sheet_name(dataset_name, &self.options.sheet_name_replace_to);
        let schema = discover_schema(records);

        let (n_records, n_fields) = match &schema {
            Some(schema) => (records.len(), schema.width()),
            None => (0, 0),
        };
        if let Some(schema) = &schema
            && let Err(msg) = validate_unique_columns(&schema.fields)
        {
            tracing::warn!(dataset = %dataset_name, "{msg}");
            ctx.report.warn(format!("{dataset_name:?}: {msg}"));
        }

        let l_sheet_parts = plan_sheet_slices(n_records, n_fields, &c_sheet_name, &mut ctx.report);
        if l_sheet_parts.len() > 1 {
            tracing::warn!(
                dataset = %dataset_name,
                n_sheets = l_sheet_parts.len(),
                "dataset exceeds worksheet limits; split into continuation sheets"
            );
        }

        let mut n_cells_missing = 0usize;
        let mut n_cells_truncated = 0usize;
        for sheet_slice in l_sheet_parts {
            let sheet_name_unique =
                derive_unique_sheet_name(&mut ctx.set_sheet_names_existing, &sheet_slice.sheet_name);
            if sheet_name_unique != sheet_slice.sheet_name {
                tracing::warn!(
                    dataset = %dataset_name,
                    sheet = %sheet_name_unique,
                    "sheet name collision resolved with suffix"
                );
                ctx.report.warn(format!(
                    "Sheet name {:?} already used; dataset {dataset_name:?} written as {sheet_name_unique:?}.",
                    sheet_slice.sheet_name
                ));
            }

            let worksheet = ctx.workbook.add_worksheet();
            worksheet.set_name(&sheet_name_unique)?;

            let Some(schema) = &schema else {
                tracing::debug!(dataset = %dataset_name, sheet = %sheet_name_unique, "empty dataset");
                ctx.report.sections.push(SpecExportSection {
                    dataset_name: dataset_name.to_string(),
                    section_name: sheet_name_unique,
                    n_rows: 0,
                    n_cols: 0,
                });
                continue;
            };

            let l_header = &schema.fields
                [sheet_slice.col_start_inclusive..sheet_slice.col_end_exclusive];
            let mut l_width_by_col_header = vec![0usize; l_header.len()];
            let mut l_width_by_col_body = vec![0usize; l_header.len()];

            for (n_idx_col, c_name) in l_header.iter().enumerate() {
                worksheet.write_string_with_format(
                    0,
                    cast_col_num(n_idx_col)?,
                    c_name,
                    &ctx.fmt_header,
                )?;
                l_width_by_col_header[n_idx_col] = estimate_unicode_string_width(c_name);
            }
            if self.options.if_freeze_header {
                worksheet.set_freeze_panes(1, 0)?;
            }

            let policy_autofit = &self.options.policy_autofit;
            let n_rows_autofit_max = policy_autofit.height_body_inferred_max.unwrap_or(usize::MAX);

            let l_records_slice =
                &records[sheet_slice.row_start_inclusive..sheet_slice.row_end_exclusive];
            for (n_row_local, record) in l_records_slice.iter().enumerate() {
                let row = derive_row_values(schema, &**record);
                if sheet_slice.col_start_inclusive == 0 {
                    n_cells_missing += row.n_missing;
                }

                for n_idx_col in 0..l_header.len() {
                    let n_idx_col_abs = sheet_slice.col_start_inclusive + n_idx_col;
                    let mut value = normalize_grid_value(row.values[n_idx_col_abs].as_ref());
                    if truncate_cell_text(&mut value) {
                        n_cells_truncated += 1;
                    }

                    if n_row_local < n_rows_autofit_max {
                        l_width_by_col_body[n_idx_col] = usize::max(
                            l_width_by_col_body[n_idx_col],
                            estimate_width_len(&value),
                        );
                    }

                    write_grid_cell(
                        worksheet,
                        1 + n_row_local,
                        n_idx_col,
                        &value,
                        &ctx.fmt_text,
                        &ctx.fmt_datetime,
                    )?;
                }
            }

            apply_autofit(
                worksheet,
                policy_autofit,
                &l_width_by_col_header,
                &l_width_by_col_body,
            )?;

            tracing::debug!(
                dataset = %dataset_name,
                sheet = %sheet_name_unique,
                n_rows = l_records_slice.len(),
                n_cols = l_header.len(),
                "sheet written"
            );
            ctx.report.sections.push(derive_section(
                dataset_name,
                sheet_name_unique,
                &sheet_slice,
            ));
        }

        if n_cells_missing > 0 {
            tracing::warn!(
                dataset = %dataset_name,
                n_cells_missing,
                "records lack fields of the first record; cells left empty"
            );
            ctx.report.warn(format!(
                "{dataset_name:?}: {n_cells_missing} cell(s) had no matching field in the first record's schema and were written empty."
            ));
        }

        if n_cells_truncated > 0 {
            tracing::warn!(
                dataset = %dataset_name,
                n_cells_truncated,
                "text longer than the worksheet cell limit was truncated"
            );
            ctx.report.warn(format!(
                "{dataset_name:?}: {n_cells_truncated} cell(s) exceeded {N_LEN_EXCEL_CELL_TEXT_MAX} characters and were truncated."
            ));
        }

        Ok(())
    }
}

impl ReportExporter for XlsxReportExporter {
    fn format(&self) -> EnumExportFormat {
        EnumExportFormat::Xlsx
    }

    fn default_title(&self) -> &'static str {
        C_TITLE_DEFAULT_XLSX
    }

    fn export_bundle(&self, bundle: &ReportBundle) -> Result<SpecExportOutput, ExportError> {
        let _span = tracing::info_span!("export_xlsx", n_datasets = bundle.len()).entered();
        self.write_bundle(bundle)
    }
}

fn derive_section(
    dataset_name: &str,
    section_name: String,
    sheet_slice: &SpecSheetSlice,
) -> SpecExportSection {
    SpecExportSection {
        dataset_name: dataset_name.to_string(),
        section_name,
        n_rows: sheet_slice.row_end_exclusive - sheet_slice.row_start_inclusive,
        n_cols: sheet_slice.col_end_exclusive - sheet_slice.col_start_inclusive,
    }
}

/// Estimate displayed width units for one normalized cell value.
pub fn estimate_width_len(value: &EnumGridCellValue) -> usize {
    match value {
        EnumGridCellValue::Text(s) => estimate_unicode_string_width(s),
        EnumGridCellValue::Bool(true) => 4,
        EnumGridCellValue::Bool(false) => 5,
        EnumGridCellValue::DateTime(_) => C_NUM_FORMAT_DATETIME.len(),
    }
}

fn apply_autofit(
    worksheet: &mut Worksheet,
    policy_autofit: &SpecAutofitCellsPolicy,
    l_width_by_col_header: &[usize],
    l_width_by_col_body: &[usize],
) -> Result<(), ExportError> {
    if matches!(policy_autofit.rule_columns, EnumAutofitColumnsRule::None) {
        return Ok(());
    }

    let n_min = usize::max(1, policy_autofit.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy_autofit.width_cell_max));
    let n_pad = policy_autofit.width_cell_padding;

    for n_idx_col in 0..l_width_by_col_header.len() {
        let n_width_recorded = match policy_autofit.rule_columns {
            EnumAutofitColumnsRule::Header => l_width_by_col_header[n_idx_col],
            EnumAutofitColumnsRule::Body => l_width_by_col_body[n_idx_col],
            EnumAutofitColumnsRule::All | EnumAutofitColumnsRule::None => usize::max(
                l_width_by_col_header[n_idx_col],
                l_width_by_col_body[n_idx_col],
            ),
        };
        let n_width_final = usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad));
        worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
    }
    Ok(())
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), ExportError> {
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(ExportError::InvalidOptions(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn write_grid_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumGridCellValue,
    fmt_text: &Format,
    fmt_datetime: &Format,
) -> Result<(), ExportError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumGridCellValue::Text(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, fmt_text)?;
        }
        EnumGridCellValue::Bool(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, fmt_text)?;
        }
        EnumGridCellValue::DateTime(val) if is_excel_date_in_range(val) => {
            worksheet.write_datetime_with_format(n_row, n_col, val, fmt_datetime)?;
        }
        EnumGridCellValue::DateTime(val) => {
            let c_text = val.format(C_FMT_DATETIME_TEXT).to_string();
            worksheet.write_string_with_format(n_row, n_col, c_text, fmt_text)?;
        }
    }
    Ok(())
}

/// Cut a text cell to the worksheet cell limit; `true` when text was dropped.
fn truncate_cell_text(value: &mut EnumGridCellValue) -> bool {
    let EnumGridCellValue::Text(text) = value else {
        return false;
    };
    match text.char_indices().nth(N_LEN_EXCEL_CELL_TEXT_MAX) {
        Some((n_byte_end, _)) => {
            text.truncate(n_byte_end);
            true
        }
        None => false,
    }
}

/// Excel serial dates cover years 1900 through 9999.
fn is_excel_date_in_range(value: &NaiveDateTime) -> bool {
    (1900..=9999).contains(&value.year())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, ExportError> {
    u32::try_from(value).map_err(|_| ExportError::SheetLimit(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, ExportError> {
    u16::try_from(value)
        .map_err(|_| ExportError::SheetLimit(format!("column index overflow: {value}")))
}
