//! Format selection and single entry point for report export.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::bundle::ReportBundle;
use crate::conf::{
    C_CONTENT_TYPE_PDF, C_CONTENT_TYPE_XLSX, derive_default_pdf_layout,
    derive_default_xlsx_export_options,
};
use crate::pdf::PdfReportExporter;
use crate::record::ExportRecord;
use crate::spec::{ExportError, SpecExportOutput, SpecPdfLayout, SpecXlsxExportOptions};
use crate::xlsx::XlsxReportExporter;

////////////////////////////////////////////////////////////////////////////////
// #region ExportFormat

/// Output document family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumExportFormat {
    /// Spreadsheet workbook (`.xlsx`).
    Xlsx,
    /// Paginated document (`.pdf`).
    Pdf,
}

impl EnumExportFormat {
    /// Every supported format.
    pub const ALL: [EnumExportFormat; 2] = [EnumExportFormat::Xlsx, EnumExportFormat::Pdf];

    /// Parse a caller-supplied token.
    ///
    /// A missing or all-whitespace token selects the workbook format. Any
    /// other token must match exactly, ignoring case, so `" pdf "` is
    /// rejected; `excel` and `xlsx` are synonyms.
    pub fn parse_token(token: Option<&str>) -> Result<Self, ExportError> {
        let c_token = token.unwrap_or_default();
        if c_token.trim().is_empty() {
            return Ok(Self::Xlsx);
        }
        match c_token.to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExportError::UnsupportedFormat(c_token.to_string())),
        }
    }

    /// HTTP content type of the rendered bytes.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => C_CONTENT_TYPE_XLSX,
            Self::Pdf => C_CONTENT_TYPE_PDF,
        }
    }

    /// File extension without the leading dot.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for EnumExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(Some(s))
    }
}

impl fmt::Display for EnumExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_extension())
    }
}

/// Download file name `<prefix>_<yyyyMMddHHmmss>.<ext>`.
pub fn derive_export_file_name(
    prefix: &str,
    format: EnumExportFormat,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        "{prefix}_{}.{}",
        timestamp.format("%Y%m%d%H%M%S"),
        format.file_extension()
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Exporter

/// Renderer of a whole bundle into one document.
pub trait ReportExporter: Send + Sync {
    /// Format produced by this exporter.
    fn format(&self) -> EnumExportFormat;

    /// Dataset title used by [`ReportExporter::export_records`] when none is given.
    fn default_title(&self) -> &'static str;

    /// Render every dataset of `bundle`, in bundle order.
    fn export_bundle(&self, bundle: &ReportBundle) -> Result<SpecExportOutput, ExportError>;

    /// Render a single collection as a one-dataset bundle.
    fn export_records<T, I>(&self, items: I, title: Option<&str>) -> Result<Vec<u8>, ExportError>
    where
        Self: Sized,
        T: ExportRecord + 'static,
        I: IntoIterator<Item = T>,
    {
        let bundle = ReportBundle::from_records(title.unwrap_or(self.default_title()), items);
        Ok(self.export_bundle(&bundle)?.bytes)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Service

/// Routes a bundle to the exporter matching a format token.
#[derive(Debug, Clone, Default)]
pub struct ReportExportService {
    xlsx: XlsxReportExporter,
    pdf: PdfReportExporter,
}

impl ReportExportService {
    /// Service with default workbook options and page layout.
    pub fn new() -> Self {
        Self::with_options(derive_default_xlsx_export_options(), derive_default_pdf_layout())
    }

    /// Service with explicit exporter settings.
    pub fn with_options(options_xlsx: SpecXlsxExportOptions, layout_pdf: SpecPdfLayout) -> Self {
        Self {
            xlsx: XlsxReportExporter::new(options_xlsx),
            pdf: PdfReportExporter::new(layout_pdf),
        }
    }

    /// Exporter serving `format`.
    pub fn exporter(&self, format: EnumExportFormat) -> &dyn ReportExporter {
        match format {
            EnumExportFormat::Xlsx => &self.xlsx,
            EnumExportFormat::Pdf => &self.pdf,
        }
    }

    /// Render `bundle` in the format named by `token`.
    pub fn export(&self, bundle: &ReportBundle, token: Option<&str>) -> Result<Vec<u8>, ExportError> {
        Ok(self.export_with_report(bundle, token)?.bytes)
    }

    /// Like [`Self::export`], also returning rendered sections and warnings.
    pub fn export_with_report(
        &self,
        bundle: &ReportBundle,
        token: Option<&str>,
    ) -> Result<SpecExportOutput, ExportError> {
        let format = match EnumExportFormat::parse_token(token) {
            Ok(format) => format,
            Err(err) => {
                tracing::warn!(token = ?token, "rejected export format token");
                return Err(err);
            }
        };
        tracing::debug!(%format, n_datasets = bundle.len(), "dispatching export");
        self.exporter(format).export_bundle(bundle)
    }
}

/// Render `bundle` with default settings in the format named by `token`.
pub fn export(bundle: &ReportBundle, token: Option<&str>) -> Result<Vec<u8>, ExportError> {
    ReportExportService::new().export(bundle, token)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn tokens_resolve_case_insensitively() {
        assert_eq!(EnumExportFormat::parse_token(None).ok(), Some(EnumExportFormat::Xlsx));
        assert_eq!(EnumExportFormat::parse_token(Some("")).ok(), Some(EnumExportFormat::Xlsx));
        assert_eq!(EnumExportFormat::parse_token(Some("  ")).ok(), Some(EnumExportFormat::Xlsx));
        assert_eq!(EnumExportFormat::parse_token(Some("EXCEL")).ok(), Some(EnumExportFormat::Xlsx));
        assert_eq!(EnumExportFormat::parse_token(Some("Xlsx")).ok(), Some(EnumExportFormat::Xlsx));
        assert_eq!("PDF".parse::<EnumExportFormat>().ok(), Some(EnumExportFormat::Pdf));
    }

    #[test]
    fn padded_token_is_not_blank_and_is_rejected_verbatim() {
        let err = EnumExportFormat::parse_token(Some(" pdf ")).expect_err("padded token");
        match err {
            ExportError::UnsupportedFormat(token) => assert_eq!(token, " pdf "),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            EnumExportFormat::parse_token(Some("\t\n")).ok(),
            Some(EnumExportFormat::Xlsx)
        );
    }

    #[test]
    fn unknown_token_is_rejected_with_its_text() {
        let err = EnumExportFormat::parse_token(Some("csv")).expect_err("csv is unsupported");
        match err {
            ExportError::UnsupportedFormat(token) => assert_eq!(token, "csv"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn service_rejects_unknown_token_before_rendering() {
        let bundle = ReportBundle::new();
        let err = export(&bundle, Some("docx")).expect_err("docx is unsupported");
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
    }

    #[test]
    fn content_type_and_extension_follow_format() {
        assert_eq!(EnumExportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(
            EnumExportFormat::Xlsx.content_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(EnumExportFormat::Xlsx.to_string(), "xlsx");
    }

    #[test]
    fn file_name_embeds_compact_timestamp() {
        let ts = Utc
            .with_ymd_and_hms(2025, 10, 14, 23, 30, 48)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            derive_export_file_name("Applicants", EnumExportFormat::Pdf, ts),
            "Applicants_20251014233048.pdf"
        );
    }

    #[test]
    fn service_routes_to_matching_exporter() {
        let service = ReportExportService::new();
        assert_eq!(service.exporter(EnumExportFormat::Pdf).format(), EnumExportFormat::Pdf);
        assert_eq!(service.exporter(EnumExportFormat::Xlsx).default_title(), "Sheet1");
        assert_eq!(service.exporter(EnumExportFormat::Pdf).default_title(), "Report");
    }
}
