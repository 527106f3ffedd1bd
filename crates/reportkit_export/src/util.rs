//! Stateless helper utilities shared by the exporters.

use std::collections::BTreeSet;

use crate::conf::{
    C_SHEET_NAME_FALLBACK, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{SpecExportReport, SpecSheetSlice};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
///
/// Blank names map to [`C_SHEET_NAME_FALLBACK`]. Leading/trailing apostrophes
/// and the reserved name `History` are neutralized as well.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    if name.trim().is_empty() {
        return C_SHEET_NAME_FALLBACK.to_string();
    }

    let mut c_name = String::with_capacity(name.len());
    for chr in name.chars() {
        if TUP_EXCEL_ILLEGAL.contains(&chr) {
            c_name.push_str(replace_to);
        } else {
            c_name.push(chr);
        }
    }

    let mut c_name: String = c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect();
    if c_name.starts_with('\'') {
        c_name.replace_range(..1, replace_to);
    }
    if c_name.ends_with('\'') {
        let n_len = c_name.len();
        c_name.replace_range(n_len - 1.., replace_to);
    }
    if c_name.eq_ignore_ascii_case("history") {
        c_name.push_str(replace_to);
    }

    let c_name: String = c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect();
    if c_name.trim().is_empty() {
        return C_SHEET_NAME_FALLBACK.to_string();
    }
    c_name
}

/// Return `name` or a `name__N` variant not yet present in `existing`.
///
/// The chosen name is inserted into `existing`.
pub fn derive_unique_sheet_name(existing: &mut BTreeSet<String>, name: &str) -> String {
    if !contains_case_insensitive(existing, name) {
        existing.insert(name.to_string());
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let c_suffix = format!("__{n_idx}");
        let n_len_base_max =
            usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len()));
        let c_base: String = name.chars().take(n_len_base_max).collect();
        let candidate = format!("{c_base}{c_suffix}");
        if !contains_case_insensitive(existing, &candidate) {
            existing.insert(candidate.clone());
            return candidate;
        }
        n_idx += 1;
    }
}

fn contains_case_insensitive(existing: &BTreeSet<String>, name: &str) -> bool {
    let c_name_lower = name.to_lowercase();
    existing
        .iter()
        .any(|c_existing| c_existing.to_lowercase() == c_name_lower)
}

/// Split a dataset into sheet slices that fit the worksheet limits.
///
/// Every slice carries its own header row. An empty dataset yields one
/// empty slice so its sheet is still created.
pub fn plan_sheet_slices(
    n_records: usize,
    n_fields: usize,
    sheet_name: &str,
    report: &mut SpecExportReport,
) -> Vec<SpecSheetSlice> {
    let l_bounds_col = derive_slice_bounds(n_fields, N_NCOLS_EXCEL_MAX);
    let l_bounds_row = derive_slice_bounds(n_records, N_NROWS_EXCEL_MAX - 1);
    let n_parts_total = l_bounds_col.len() * l_bounds_row.len();

    let l_sheet_parts: Vec<SpecSheetSlice> = l_bounds_col
        .iter()
        .flat_map(|bounds_col| l_bounds_row.iter().map(move |bounds_row| (*bounds_col, *bounds_row)))
        .enumerate()
        .map(|(n_idx, ((n_col_start, n_col_end), (n_row_start, n_row_end)))| SpecSheetSlice {
            sheet_name: if n_parts_total == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, n_idx + 1)
            },
            row_start_inclusive: n_row_start,
            row_end_exclusive: n_row_end,
            col_start_inclusive: n_col_start,
            col_end_exclusive: n_col_end,
        })
        .collect();

    if n_parts_total > 1 {
        report.warn(format!(
            "Dataset {sheet_name:?} exceeds worksheet limits: split into {n_parts_total} sheets."
        ));
    }
    l_sheet_parts
}

/// Half-open `(start, end)` ranges of at most `n_step` items; `[(0, 0)]` when empty.
fn derive_slice_bounds(n_total: usize, n_step: usize) -> Vec<(usize, usize)> {
    if n_total == 0 {
        return vec![(0, 0)];
    }
    (0..n_total)
        .step_by(n_step)
        .map(|n_start| (n_start, usize::min(n_total, n_start + n_step)))
        .collect()
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WidthEstimation

/// Approximate displayed width of `s` in character units.
///
/// Non-ASCII characters count as 1.6 units to cover wide glyphs.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_illegal_chars() {
        assert_eq!(sanitize_sheet_name("A/B*C", "_"), "A_B_C");
        assert_eq!(sanitize_sheet_name("[Q1] a\\b?", "_"), "_Q1_ a_b_");
        assert_eq!(sanitize_sheet_name("Ratio 1:2", "_"), "Ratio 1_2");
    }

    #[test]
    fn sanitize_truncates_to_31_chars() {
        let c_name = "ApplicationsByEmployerAndCategory2025";
        let c_sanitized = sanitize_sheet_name(c_name, "_");
        assert_eq!(c_sanitized.chars().count(), 31);
        assert_eq!(c_sanitized, "ApplicationsByEmployerAndCatego");
    }

    #[test]
    fn sanitize_falls_back_for_blank_names() {
        assert_eq!(sanitize_sheet_name("", "_"), "Sheet1");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet1");
    }

    #[test]
    fn sanitize_neutralizes_apostrophes_and_reserved_name() {
        assert_eq!(sanitize_sheet_name("'Quoted'", "_"), "_Quoted_");
        assert_eq!(sanitize_sheet_name("History", "_"), "History_");
    }

    #[test]
    fn unique_name_appends_counter_within_limit() {
        let mut set_names = BTreeSet::new();
        assert_eq!(derive_unique_sheet_name(&mut set_names, "A_B"), "A_B");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "A_B"), "A_B__2");
        assert_eq!(derive_unique_sheet_name(&mut set_names, "a_b"), "a_b__3");

        let c_long = "X".repeat(31);
        derive_unique_sheet_name(&mut set_names, &c_long);
        let c_second = derive_unique_sheet_name(&mut set_names, &c_long);
        assert_eq!(c_second.chars().count(), 31);
        assert!(c_second.ends_with("__2"));
    }

    #[test]
    fn empty_table_still_gets_one_slice() {
        let mut report = SpecExportReport::default();
        let l_slices = plan_sheet_slices(0, 0, "Empty", &mut report);
        assert_eq!(l_slices.len(), 1);
        assert_eq!(l_slices[0].sheet_name, "Empty");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn oversized_table_is_split_with_warning() {
        let mut report = SpecExportReport::default();
        let l_slices = plan_sheet_slices(N_NROWS_EXCEL_MAX + 10, 3, "Big", &mut report);
        assert_eq!(l_slices.len(), 2);
        assert_eq!(l_slices[0].sheet_name, "Big_1");
        assert_eq!(l_slices[0].row_end_exclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(l_slices[1].row_start_inclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(l_slices[1].row_end_exclusive, N_NROWS_EXCEL_MAX + 10);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn width_estimate_weights_non_ascii() {
        assert_eq!(estimate_unicode_string_width("abc"), 3);
        assert_eq!(estimate_unicode_string_width("日本"), 3);
    }
}
