//! Flowing-document exporter: one paginated section per dataset.
//!
//! Pages are composed directly as content-stream operations and assembled
//! with `lopdf`. Text uses the standard Type1 fonts with `WinAnsiEncoding`,
//! so no font program is embedded and output stays byte-for-byte
//! deterministic for a given bundle.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::bundle::{BoxedRecord, ReportBundle};
use crate::conf::{C_TEXT_NO_DATA, C_TITLE_DEFAULT_PDF};
use crate::dispatch::{EnumExportFormat, ReportExporter};
use crate::normalize::normalize_text_value;
use crate::schema::{derive_row_values, discover_schema, validate_unique_columns};
use crate::spec::{
    ExportError, SpecExportOutput, SpecExportReport, SpecExportSection, SpecPdfLayout,
};

////////////////////////////////////////////////////////////////////////////////
// #region FontMetrics

/// Helvetica advance widths for `0x20..=0x7E`, in 1/1000 em.
const TUP_WIDTH_HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
    278, 278, 584, 584, 584, 556, 1015, //
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, //
    278, 278, 278, 469, 556, 333, //
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, //
    334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for `0x20..=0x7E`, in 1/1000 em.
const TUP_WIDTH_HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
    333, 333, 584, 584, 584, 611, 975, //
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, //
    333, 278, 333, 584, 556, 333, //
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389,
    556, 333, 611, 556, 778, 556, 556, 500, //
    389, 280, 389, 584,
];

/// Width used for bytes outside the ASCII table.
const N_WIDTH_GLYPH_DEFAULT: u16 = 556;

/// Fraction of the font size between a line's top and its baseline.
const N_RATIO_BASELINE: f32 = 1.0;

/// Font slot of the page resources.
///
/// Fonts are fixed to the Helvetica pair the width tables above describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPdfFont {
    /// Body text.
    Regular,
    /// Headings and table header cells.
    Bold,
}

impl EnumPdfFont {
    fn resource_key(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    fn glyph_width(self, byte: u8) -> u16 {
        let tup_width = match self {
            Self::Regular => &TUP_WIDTH_HELVETICA,
            Self::Bold => &TUP_WIDTH_HELVETICA_BOLD,
        };
        match byte {
            0x20..=0x7E => tup_width[usize::from(byte - 0x20)],
            _ => N_WIDTH_GLYPH_DEFAULT,
        }
    }
}

/// Map one char onto the WinAnsi code page; unmappable chars become `?`.
pub fn convert_char_to_win_ansi(chr: char) -> u8 {
    match chr {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => chr as u8,
        '\t' => b' ',
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => b'?',
    }
}

/// Encode `text` for a `WinAnsiEncoding` font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(convert_char_to_win_ansi).collect()
}

/// Rendered width of `text` in points.
pub fn measure_text_width(text: &str, font: EnumPdfFont, size: f32) -> f32 {
    let n_units: u32 = text
        .chars()
        .map(|chr| u32::from(font.glyph_width(convert_char_to_win_ansi(chr))))
        .sum();
    n_units as f32 * size / 1000.0
}

fn measure_char_width(chr: char, font: EnumPdfFont, size: f32) -> f32 {
    f32::from(font.glyph_width(convert_char_to_win_ansi(chr))) * size / 1000.0
}

/// Greedy word wrap of `text` into lines no wider than `width_max`.
///
/// Explicit newlines start a new line. Words wider than a full line are
/// broken between characters. Always returns at least one line.
pub fn wrap_text(text: &str, font: EnumPdfFont, size: f32, width_max: f32) -> Vec<String> {
    let mut l_lines = Vec::new();

    for c_paragraph in text.split('\n') {
        let c_paragraph = c_paragraph.trim_end_matches('\r');
        let mut c_line = String::new();
        let mut n_width_line = 0.0f32;

        for c_word in c_paragraph.split(' ') {
            let n_width_word = measure_text_width(c_word, font, size);
            let n_width_sep = if c_line.is_empty() {
                0.0
            } else {
                measure_char_width(' ', font, size)
            };

            if n_width_line + n_width_sep + n_width_word <= width_max {
                if !c_line.is_empty() {
                    c_line.push(' ');
                }
                c_line.push_str(c_word);
                n_width_line += n_width_sep + n_width_word;
                continue;
            }

            if !c_line.is_empty() {
                l_lines.push(std::mem::take(&mut c_line));
                n_width_line = 0.0;
            }

            for chr in c_word.chars() {
                let n_width_chr = measure_char_width(chr, font, size);
                if !c_line.is_empty() && n_width_line + n_width_chr > width_max {
                    l_lines.push(std::mem::take(&mut c_line));
                    n_width_line = 0.0;
                }
                c_line.push(chr);
                n_width_line += n_width_chr;
            }
        }

        l_lines.push(c_line);
    }

    l_lines
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PageComposer

/// Accumulates content-stream operations page by page.
///
/// Coordinates are PDF user space (origin bottom-left). `n_y_top` is the top
/// of the free area on the current page.
struct PdfPageComposer<'a> {
    layout: &'a SpecPdfLayout,
    l_pages: Vec<Vec<Operation>>,
    l_ops: Vec<Operation>,
    n_y_top: f32,
    if_page_open: bool,
}

impl<'a> PdfPageComposer<'a> {
    fn new(layout: &'a SpecPdfLayout) -> Self {
        Self {
            layout,
            l_pages: Vec::new(),
            l_ops: Vec::new(),
            n_y_top: layout.page_height - layout.margin,
            if_page_open: false,
        }
    }

    fn start_page(&mut self) {
        if self.if_page_open {
            self.l_pages.push(std::mem::take(&mut self.l_ops));
        }
        self.if_page_open = true;
        self.n_y_top = self.layout.page_height - self.layout.margin;
    }

    fn height_left(&self) -> f32 {
        self.n_y_top - self.layout.margin
    }

    fn advance(&mut self, height: f32) {
        self.n_y_top -= height;
    }

    fn draw_text(&mut self, font: EnumPdfFont, size: f32, x: f32, y: f32, text: &str) {
        self.l_ops.push(Operation::new("BT", vec![]));
        self.l_ops.push(Operation::new(
            "Tf",
            vec![font.resource_key().into(), size.into()],
        ));
        self.l_ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.l_ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        self.l_ops.push(Operation::new("ET", vec![]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.l_ops.push(Operation::new("q", vec![]));
        self.l_ops.push(Operation::new("g", vec![gray.into()]));
        self.l_ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.l_ops.push(Operation::new("f", vec![]));
        self.l_ops.push(Operation::new("Q", vec![]));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        self.l_ops.push(Operation::new("q", vec![]));
        self.l_ops.push(Operation::new("w", vec![line_width.into()]));
        self.l_ops.push(Operation::new("G", vec![0.0f32.into()]));
        self.l_ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.l_ops.push(Operation::new("S", vec![]));
        self.l_ops.push(Operation::new("Q", vec![]));
    }

    /// Close the current page; a document always has at least one page.
    fn finish(mut self) -> Vec<Vec<Operation>> {
        if self.if_page_open || self.l_pages.is_empty() {
            self.l_pages.push(self.l_ops);
        }
        self.l_pages
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableLayout

/// One table row with wrapped cell lines.
struct SpecPdfTableRow {
    l_cells: Vec<Vec<String>>,
}

impl SpecPdfTableRow {
    fn n_lines_max(&self) -> usize {
        self.l_cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }

    fn height(&self, size: f32, leading: f32, padding: f32) -> f32 {
        self.n_lines_max() as f32 * size * leading + 2.0 * padding
    }

    fn truncate_lines(&mut self, n_lines_max: usize) -> bool {
        let mut if_truncated = false;
        for l_lines in &mut self.l_cells {
            if l_lines.len() > n_lines_max {
                l_lines.truncate(n_lines_max);
                if_truncated = true;
            }
        }
        if_truncated
    }
}

/// Styling of one table row family (header or body).
#[derive(Debug, Clone, Copy)]
struct SpecPdfRowStyle {
    font: EnumPdfFont,
    size: f32,
    padding: f32,
    shade_gray: Option<f32>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Exporter

/// Paginated document exporter.
///
/// Holds only layout; every call composes its own document.
#[derive(Debug, Clone, Default)]
pub struct PdfReportExporter {
    layout: SpecPdfLayout,
}

impl PdfReportExporter {
    /// Create exporter with explicit page layout.
    pub fn new(layout: SpecPdfLayout) -> Self {
        Self { layout }
    }

    /// Page layout.
    pub fn layout(&self) -> &SpecPdfLayout {
        &self.layout
    }

    fn write_bundle(&self, bundle: &ReportBundle) -> Result<SpecExportOutput, ExportError> {
        validate_layout(&self.layout)?;

        let mut composer = PdfPageComposer::new(&self.layout);
        let mut report = SpecExportReport::default();

        for (c_dataset_name, records) in bundle.get_all() {
            self.write_section(&mut composer, &mut report, c_dataset_name, records);
        }

        let l_pages = composer.finish();
        let n_pages = l_pages.len();
        let bytes = self.assemble_document(l_pages)?;
        tracing::info!(
            n_sections = report.sections.len(),
            n_pages,
            n_warnings = report.warnings.len(),
            n_bytes = bytes.len(),
            "pdf export finished"
        );
        Ok(SpecExportOutput { bytes, report })
    }

    fn write_section(
        &self,
        composer: &mut PdfPageComposer<'_>,
        report: &mut SpecExportReport,
        dataset_name: &str,
        records: &[BoxedRecord],
    ) {
        let layout = &self.layout;
        composer.start_page();
        self.write_paragraph(composer, EnumPdfFont::Bold, layout.size_heading, dataset_name);
        composer.advance(layout.spacing_heading_after);

        let Some(schema) = discover_schema(records).filter(|schema| schema.width() > 0) else {
            self.write_paragraph(
                composer,
                EnumPdfFont::Regular,
                layout.size_placeholder,
                C_TEXT_NO_DATA,
            );
            tracing::debug!(dataset = %dataset_name, "empty dataset");
            report.sections.push(SpecExportSection {
                dataset_name: dataset_name.to_string(),
                section_name: dataset_name.to_string(),
                n_rows: 0,
                n_cols: 0,
            });
            return;
        };
        if let Err(msg) = validate_unique_columns(&schema.fields) {
            tracing::warn!(dataset = %dataset_name, "{msg}");
            report.warn(format!("{dataset_name:?}: {msg}"));
        }

        let style_header = SpecPdfRowStyle {
            font: EnumPdfFont::Bold,
            size: layout.size_table_header,
            padding: layout.padding_header,
            shade_gray: Some(layout.shade_header_gray),
        };
        let style_body = SpecPdfRowStyle {
            font: EnumPdfFont::Regular,
            size: layout.size_table_body,
            padding: layout.padding_body,
            shade_gray: None,
        };
        let n_width_col = layout.width_content() / schema.width() as f32;

        let row_header = SpecPdfTableRow {
            l_cells: schema
                .fields
                .iter()
                .map(|c_name| wrap_cell(c_name, &style_header, n_width_col))
                .collect(),
        };
        let n_height_header = self.derive_row_height(&row_header, &style_header);
        let n_line_height_body = style_body.size * layout.line_leading;
        let n_lines_body_max = usize::max(
            1,
            ((layout.height_content() - n_height_header - 2.0 * style_body.padding)
                / n_line_height_body)
                .floor() as usize,
        );

        if composer.height_left() < n_height_header {
            composer.start_page();
        }
        self.draw_row(composer, &row_header, &style_header, n_width_col);

        let mut n_cells_missing = 0usize;
        let mut n_rows_truncated = 0usize;
        for record in records {
            let row_values = derive_row_values(&schema, &**record);
            n_cells_missing += row_values.n_missing;

            let mut row_body = SpecPdfTableRow {
                l_cells: row_values
                    .values
                    .iter()
                    .map(|value| {
                        wrap_cell(&normalize_text_value(value.as_ref()), &style_body, n_width_col)
                    })
                    .collect(),
            };
            if row_body.truncate_lines(n_lines_body_max) {
                n_rows_truncated += 1;
            }

            if composer.height_left() < self.derive_row_height(&row_body, &style_body) {
                composer.start_page();
                self.draw_row(composer, &row_header, &style_header, n_width_col);
            }
            self.draw_row(composer, &row_body, &style_body, n_width_col);
        }

        if n_cells_missing > 0 {
            tracing::warn!(
                dataset = %dataset_name,
                n_cells_missing,
                "records lack fields of the first record; cells left empty"
            );
            report.warn(format!(
                "{dataset_name:?}: {n_cells_missing} cell(s) had no matching field in the first record's schema and were written empty."
            ));
        }
        if n_rows_truncated > 0 {
            tracing::warn!(dataset = %dataset_name, n_rows_truncated, "rows taller than a page were cut");
            report.warn(format!(
                "{dataset_name:?}: {n_rows_truncated} row(s) exceeded one page and were truncated."
            ));
        }

        tracing::debug!(
            dataset = %dataset_name,
            n_rows = records.len(),
            n_cols = schema.width(),
            "section written"
        );
        report.sections.push(SpecExportSection {
            dataset_name: dataset_name.to_string(),
            section_name: dataset_name.to_string(),
            n_rows: records.len(),
            n_cols: schema.width(),
        });
    }

    /// Full-width wrapped paragraph; continues on a new page when needed.
    fn write_paragraph(
        &self,
        composer: &mut PdfPageComposer<'_>,
        font: EnumPdfFont,
        size: f32,
        text: &str,
    ) {
        let layout = &self.layout;
        let n_line_height = size * layout.line_leading;
        for c_line in wrap_text(text, font, size, layout.width_content()) {
            if composer.height_left() < n_line_height {
                composer.start_page();
            }
            let n_y_baseline = composer.n_y_top - size * N_RATIO_BASELINE;
            composer.draw_text(font, size, layout.margin, n_y_baseline, &c_line);
            composer.advance(n_line_height);
        }
    }

    fn derive_row_height(&self, row: &SpecPdfTableRow, style: &SpecPdfRowStyle) -> f32 {
        row.height(style.size, self.layout.line_leading, style.padding)
    }

    fn draw_row(
        &self,
        composer: &mut PdfPageComposer<'_>,
        row: &SpecPdfTableRow,
        style: &SpecPdfRowStyle,
        n_width_col: f32,
    ) {
        let layout = &self.layout;
        let n_height = self.derive_row_height(row, style);
        let n_y_top = composer.n_y_top;
        let n_y_bottom = n_y_top - n_height;
        let n_line_height = style.size * layout.line_leading;

        for (n_idx_col, l_lines) in row.l_cells.iter().enumerate() {
            let n_x_left = layout.margin + n_idx_col as f32 * n_width_col;
            if let Some(gray) = style.shade_gray {
                composer.fill_rect(n_x_left, n_y_bottom, n_width_col, n_height, gray);
            }
            composer.stroke_rect(n_x_left, n_y_bottom, n_width_col, n_height, layout.border_width);

            for (n_idx_line, c_line) in l_lines.iter().enumerate() {
                if c_line.is_empty() {
                    continue;
                }
                let n_y_baseline = n_y_top
                    - style.padding
                    - n_idx_line as f32 * n_line_height
                    - style.size * N_RATIO_BASELINE;
                composer.draw_text(
                    style.font,
                    style.size,
                    n_x_left + style.padding,
                    n_y_baseline,
                    c_line,
                );
            }
        }
        composer.advance(n_height);
    }

    fn assemble_document(&self, l_pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ExportError> {
        let layout = &self.layout;
        let mut doc = Document::with_version("1.5");
        let id_pages = doc.new_object_id();

        let id_font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => EnumPdfFont::Regular.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let id_font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => EnumPdfFont::Bold.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let id_resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                EnumPdfFont::Regular.resource_key() => id_font_regular,
                EnumPdfFont::Bold.resource_key() => id_font_bold,
            },
        });

        let mut l_kids: Vec<Object> = Vec::with_capacity(l_pages.len());
        for l_ops in l_pages {
            let content = Content { operations: l_ops };
            let id_content = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let id_page = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => id_pages,
                "Contents" => id_content,
            });
            l_kids.push(id_page.into());
        }

        let n_pages = l_kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => l_kids,
            "Count" => n_pages,
            "Resources" => id_resources,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                layout.page_width.into(),
                layout.page_height.into(),
            ],
        };
        doc.objects.insert(id_pages, Object::Dictionary(pages));

        let id_catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => id_pages,
        });
        doc.trailer.set("Root", id_catalog);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
        Ok(bytes)
    }
}

impl ReportExporter for PdfReportExporter {
    fn format(&self) -> EnumExportFormat {
        EnumExportFormat::Pdf
    }

    fn default_title(&self) -> &'static str {
        C_TITLE_DEFAULT_PDF
    }

    fn export_bundle(&self, bundle: &ReportBundle) -> Result<SpecExportOutput, ExportError> {
        let _span = tracing::info_span!("export_pdf", n_datasets = bundle.len()).entered();
        self.write_bundle(bundle)
    }
}

fn wrap_cell(text: &str, style: &SpecPdfRowStyle, n_width_col: f32) -> Vec<String> {
    let n_width_text = (n_width_col - 2.0 * style.padding).max(1.0);
    wrap_text(text, style.font, style.size, n_width_text)
}

fn validate_layout(layout: &SpecPdfLayout) -> Result<(), ExportError> {
    if layout.page_width <= 2.0 * layout.margin || layout.page_height <= 2.0 * layout.margin {
        return Err(ExportError::InvalidOptions(
            "page must be larger than its margins.".to_string(),
        ));
    }
    let l_sizes = [
        layout.size_heading,
        layout.size_placeholder,
        layout.size_table_header,
        layout.size_table_body,
        layout.line_leading,
    ];
    if l_sizes.iter().any(|val| !val.is_finite() || *val <= 0.0) {
        return Err(ExportError::InvalidOptions(
            "font sizes and line leading must be positive.".to_string(),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("Ab 1"), b"Ab 1".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{20AC}5"), vec![0x80, b'5']);
        assert_eq!(encode_win_ansi("\u{65e5}"), b"?".to_vec());
    }

    #[test]
    fn measure_uses_helvetica_metrics() {
        let n_width = measure_text_width("Ai", EnumPdfFont::Regular, 10.0);
        assert!((n_width - 8.89).abs() < 1e-4);
        assert!(
            measure_text_width("Ai", EnumPdfFont::Bold, 10.0)
                > measure_text_width("Ai", EnumPdfFont::Regular, 10.0)
        );
    }

    #[test]
    fn wrap_breaks_on_spaces_and_keeps_words_whole() {
        let l_lines = wrap_text("alpha beta gamma", EnumPdfFont::Regular, 10.0, 60.0);
        assert_eq!(l_lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn wrap_splits_overlong_words_and_honours_newlines() {
        let l_lines = wrap_text("xxxxxxxxxx", EnumPdfFont::Regular, 10.0, 20.0);
        assert!(l_lines.len() > 1);
        assert_eq!(l_lines.concat(), "xxxxxxxxxx");

        let l_lines = wrap_text("a\nb", EnumPdfFont::Regular, 10.0, 500.0);
        assert_eq!(l_lines, vec!["a", "b"]);
        assert_eq!(wrap_text("", EnumPdfFont::Regular, 10.0, 50.0), vec![""]);
    }

    #[test]
    fn document_declares_the_measured_fonts() {
        let output = PdfReportExporter::default()
            .export_bundle(&ReportBundle::new())
            .expect("pdf export");
        let doc = Document::load_mem(&output.bytes).expect("pdf parses");
        let mut l_fonts: Vec<Vec<u8>> = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_dict().ok())
            .filter_map(|dict| dict.get(b"BaseFont").and_then(Object::as_name).ok())
            .map(<[u8]>::to_vec)
            .collect();
        l_fonts.sort();
        assert_eq!(l_fonts, vec![b"Helvetica".to_vec(), b"Helvetica-Bold".to_vec()]);
    }

    #[test]
    fn composer_never_emits_zero_pages() {
        let layout = SpecPdfLayout::default();
        let composer = PdfPageComposer::new(&layout);
        assert_eq!(composer.finish().len(), 1);

        let mut composer = PdfPageComposer::new(&layout);
        composer.start_page();
        composer.start_page();
        assert_eq!(composer.finish().len(), 2);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let layout = SpecPdfLayout {
            margin: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_layout(&layout),
            Err(ExportError::InvalidOptions(_))
        ));
        assert!(validate_layout(&SpecPdfLayout::default()).is_ok());
    }
}
