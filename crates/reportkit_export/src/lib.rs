//! `reportkit_export` v1:
//! Report export kernel rendering named record datasets into a workbook or a
//! paginated document.
//!
//! Layout:
//! - `conf`      : constants and default presets
//! - `spec`      : specs/models/options/errors
//! - `record`    : record capability (`ExportRecord`, `export_record!`)
//! - `bundle`    : ordered dataset collection
//! - `schema`    : first-record schema discovery
//! - `normalize` : typed and text-only value rules
//! - `util`      : pure helper functions
//! - `xlsx`      : workbook exporter
//! - `pdf`       : paginated document exporter
//! - `dispatch`  : format token parsing and export entry point
pub mod bundle;
pub mod conf;
pub mod dispatch;
pub mod normalize;
pub mod pdf;
pub mod record;
pub mod schema;
pub mod spec;
pub mod util;
pub mod xlsx;

pub use bundle::{BoxedRecord, ReportBundle};
pub use conf::{
    C_CONTENT_TYPE_PDF, C_CONTENT_TYPE_XLSX, N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use dispatch::{
    EnumExportFormat, ReportExportService, ReportExporter, derive_export_file_name, export,
};
pub use normalize::{EnumGridCellValue, normalize_grid_value, normalize_text_value};
pub use pdf::PdfReportExporter;
pub use record::{EnumFieldValue, ExportRecord, RecordRow, ToFieldValue};
pub use schema::{SpecSchema, discover_schema};
pub use spec::{
    EnumAutofitColumnsRule, ExportError, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecExportOutput, SpecExportReport, SpecExportSection, SpecPdfLayout, SpecXlsxExportOptions,
};
pub use util::{derive_unique_sheet_name, sanitize_sheet_name};
pub use xlsx::XlsxReportExporter;
