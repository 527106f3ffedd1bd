//! Property tests for worksheet name sanitization.

use std::collections::BTreeSet;

use proptest::prelude::*;
use reportkit_export::{
    N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL, derive_unique_sheet_name, sanitize_sheet_name,
};

/// Names biased towards characters the workbook format cares about.
fn arb_sheet_name() -> impl Strategy<Value = String> {
    prop_oneof![
        ".*",
        "[A-Za-z0-9 /\\\\?*\\[\\]:']{0,48}",
        Just("History".to_string()),
        Just("   ".to_string()),
    ]
}

proptest! {
    #[test]
    fn sanitized_names_are_valid_sheet_names(name in arb_sheet_name()) {
        let c_name = sanitize_sheet_name(&name, "_");

        prop_assert!(!c_name.trim().is_empty());
        prop_assert!(c_name.chars().count() <= N_LEN_EXCEL_SHEET_NAME_MAX);
        prop_assert!(!c_name.contains(TUP_EXCEL_ILLEGAL));
        prop_assert!(!c_name.starts_with('\''));
        prop_assert!(!c_name.ends_with('\''));
        prop_assert!(!c_name.eq_ignore_ascii_case("history"));
    }

    #[test]
    fn sanitize_is_idempotent(name in arb_sheet_name()) {
        let c_once = sanitize_sheet_name(&name, "_");
        prop_assert_eq!(sanitize_sheet_name(&c_once, "_"), c_once);
    }

    #[test]
    fn unique_names_never_collide(l_names in prop::collection::vec(arb_sheet_name(), 1..12)) {
        let mut set_existing = BTreeSet::new();
        let mut set_lower = BTreeSet::new();
        for name in &l_names {
            let c_unique = derive_unique_sheet_name(&mut set_existing, &sanitize_sheet_name(name, "_"));
            prop_assert!(c_unique.chars().count() <= N_LEN_EXCEL_SHEET_NAME_MAX);
            prop_assert!(set_lower.insert(c_unique.to_lowercase()));
        }
    }
}
