//! Table-name generation properties: purity and output shape over
//! arbitrary inputs.

use proptest::prelude::*;

use tabula_core::models::SheetTableMapping;

proptest! {
    #[test]
    fn generation_is_pure(base in ".*", sheet in ".*") {
        let first = SheetTableMapping::table_name_for(&base, &sheet);
        let second = SheetTableMapping::table_name_for(&base, &sheet);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn output_is_prefix_plus_alphanumerics(base in ".*", sheet in ".*") {
        let name = SheetTableMapping::table_name_for(&base, &sheet);
        prop_assert!(name.starts_with("table_"));
        prop_assert!(name.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[test]
    fn already_clean_inputs_pass_through(
        base in "[A-Za-z0-9]{1,12}",
        sheet in "[A-Za-z0-9]{1,12}",
    ) {
        let name = SheetTableMapping::table_name_for(&base, &sheet);
        prop_assert_eq!(name, format!("table_{base}_{sheet}"));
    }
}
