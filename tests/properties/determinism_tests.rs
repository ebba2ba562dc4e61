use proptest::prelude::*;

use talentlens::profile::export::{ExportOptions, to_json};
use talentlens::profile::{ProfileBuilder, ProfileOptions};
use talentlens::registry::Registry;
use talentlens::scoring::ConfidenceScorer;
use talentlens::test_utils::fixtures::fixed_timestamp;

use crate::strategies::arb_corpus;

fn options(parallel: bool) -> ProfileOptions {
    ProfileOptions {
        parallel,
        parallel_threshold: 1,
        ..ProfileOptions::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn same_input_same_export(docs in arb_corpus(10)) {
        let registry = Registry::builtin().unwrap();
        let builder = ProfileBuilder::new(&registry, ConfidenceScorer::default(), options(false));
        let first = builder.build_profile_at("s", &docs, fixed_timestamp()).unwrap();
        let second = builder.build_profile_at("s", &docs, fixed_timestamp()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            to_json(&first.profile, ExportOptions::default()).unwrap(),
            to_json(&second.profile, ExportOptions::default()).unwrap()
        );
    }

    #[test]
    fn parallel_scan_matches_sequential(docs in arb_corpus(12)) {
        let registry = Registry::builtin().unwrap();
        let sequential = ProfileBuilder::new(&registry, ConfidenceScorer::default(), options(false))
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap();
        let parallel = ProfileBuilder::new(&registry, ConfidenceScorer::default(), options(true))
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap();
        prop_assert_eq!(sequential, parallel);
    }
}
