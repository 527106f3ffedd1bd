//! Command implementations behind the `reportkit` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reportkit_export::{
    EnumExportFormat, ReportExportService, SpecExportReport, derive_export_file_name,
};

use crate::source::read_bundle_file;

/// Dataset name prefix used when neither `--prefix` nor an input stem exists.
pub const C_PREFIX_DEFAULT: &str = "Report";

/// Resolved `export` command input.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// JSON bundle file.
    pub input: PathBuf,
    /// Raw format token; `None` selects the workbook format.
    pub format: Option<String>,
    /// Exact output path.
    pub output: Option<PathBuf>,
    /// Directory for a generated file name (default: current directory).
    pub output_dir: Option<PathBuf>,
    /// File name prefix (default: input file stem).
    pub prefix: Option<String>,
}

/// Result of a completed export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// File written.
    pub path: PathBuf,
    /// Format rendered.
    pub format: EnumExportFormat,
    /// Number of bytes written.
    pub n_bytes: usize,
    /// Sections and warnings.
    pub report: SpecExportReport,
}

/// Render the input bundle and write it to disk.
pub fn run_export(request: &ExportRequest, timestamp: DateTime<Utc>) -> Result<ExportOutcome> {
    let format = EnumExportFormat::parse_token(request.format.as_deref())
        .context("cannot select export format")?;
    let bundle = read_bundle_file(&request.input)?;

    let path = derive_output_path(request, format, timestamp);
    let _span = tracing::info_span!("export", path = %path.display(), %format).entered();

    let output = ReportExportService::new()
        .exporter(format)
        .export_bundle(&bundle)
        .with_context(|| format!("failed to render {}", request.input.display()))?;

    if let Some(dir_parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir_parent)
            .with_context(|| format!("failed to create {}", dir_parent.display()))?;
    }
    std::fs::write(&path, &output.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(n_bytes = output.bytes.len(), "report written");

    Ok(ExportOutcome {
        path,
        format,
        n_bytes: output.bytes.len(),
        report: output.report,
    })
}

/// `--output` as given, else `<output-dir>/<prefix>_<timestamp>.<ext>`.
pub fn derive_output_path(
    request: &ExportRequest,
    format: EnumExportFormat,
    timestamp: DateTime<Utc>,
) -> PathBuf {
    if let Some(path) = &request.output {
        return path.clone();
    }
    let c_prefix = request
        .prefix
        .clone()
        .or_else(|| {
            request
                .input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|prefix| !prefix.trim().is_empty())
        .unwrap_or_else(|| C_PREFIX_DEFAULT.to_string());
    let dir_output = request.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    dir_output.join(derive_export_file_name(&c_prefix, format, timestamp))
}

/// One line per supported format: extension, accepted tokens, content type.
pub fn describe_formats() -> Vec<String> {
    EnumExportFormat::ALL
        .iter()
        .map(|format| {
            let c_tokens = match format {
                EnumExportFormat::Xlsx => "excel, xlsx (default)",
                EnumExportFormat::Pdf => "pdf",
            };
            format!("{format}\t{c_tokens}\t{}", format.content_type())
        })
        .collect()
}
