use kaggle_client::api::resolve::parse_dataset_input;
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn cache_key_is_deterministic(dataset in proptest_helpers::arb_dataset_ref()) {
        let again = parse_dataset_input(&dataset.path()).expect("reparse");

        prop_assert_eq!(&again, &dataset);
        prop_assert_eq!(again.cache_key(), dataset.cache_key());
        prop_assert!(dataset.cache_key().ends_with("_parsed.json"));
    }

    #[test]
    fn distinct_datasets_never_share_local_state(
        a in proptest_helpers::arb_dataset_ref(),
        b in proptest_helpers::arb_dataset_ref(),
    ) {
        prop_assume!(a != b);
        let root = std::path::Path::new("downloads");

        prop_assert_ne!(a.cache_key(), b.cache_key());
        prop_assert_ne!(a.extraction_dir(root), b.extraction_dir(root));
        prop_assert_ne!(a.archive_file_name(), b.archive_file_name());
    }

    #[test]
    fn url_and_path_inputs_agree(dataset in proptest_helpers::arb_dataset_ref()) {
        let url = format!("https://www.kaggle.com/datasets/{}", dataset.path());
        prop_assert_eq!(parse_dataset_input(&url).expect("parse url"), dataset);
    }
}
