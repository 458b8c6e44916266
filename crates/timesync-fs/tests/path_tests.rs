use proptest::prelude::*;
use timesync_fs::{match_stem, normalize_input};

proptest! {
    #[test]
    fn test_stem_is_prefix_of_final_segment(name in "[a-zA-Z0-9_. -]{0,24}") {
        let stem = match_stem(&name);
        prop_assert!(name.starts_with(stem));
        prop_assert!(!stem.contains('/'));
    }

    #[test]
    fn test_stem_of_name_with_extension(base in "[a-z0-9_]{1,12}", ext in "[a-z0-9]{1,4}") {
        let name = format!("{}.{}", base, ext);
        prop_assert_eq!(match_stem(&name), base.as_str());
    }

    #[test]
    fn test_normalize_input_strips_quotes_and_padding(inner in "[a-zA-Z0-9/_.]{1,20}") {
        let padded = format!("  \"{}\"\t", inner);
        prop_assert_eq!(normalize_input(&padded), inner);
    }
}
