use proptest::prelude::*;

use talentlens::documents::{SourceDocument, Visibility};
use talentlens::profile::export::{ExportOptions, to_json};
use talentlens::profile::{ProfileBuilder, ProfileOptions};
use talentlens::registry::Registry;
use talentlens::scoring::ConfidenceScorer;
use talentlens::test_utils::fixtures::fixed_timestamp;

use crate::strategies::{arb_corpus, arb_kind, arb_text};

/// Tag only private documents carry, so any appearance in an export is a leak.
const MARKER: &str = "qqprivatemarkerqq";

proptest! {
    #[test]
    fn private_text_never_reaches_the_export(
        public in arb_corpus(5),
        private_texts in prop::collection::vec((arb_text(), arb_kind()), 1..4),
    ) {
        let mut docs: Vec<SourceDocument> = public
            .into_iter()
            .map(|mut doc| {
                doc.visibility = Visibility::Public;
                doc
            })
            .collect();
        for (idx, (text, kind)) in private_texts.into_iter().enumerate() {
            docs.push(SourceDocument::new(
                format!("private-{idx}"),
                format!("{MARKER} Python {text} {MARKER}"),
                kind,
                Visibility::Private,
            ));
        }

        let registry = Registry::builtin().unwrap();
        let profile = ProfileBuilder::new(&registry, ConfidenceScorer::default(), ProfileOptions::default())
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap()
            .profile;

        // Private evidence still counts.
        prop_assert!(profile.skills.contains_key("Python"));

        let exported = to_json(&profile, ExportOptions::default()).unwrap();
        prop_assert!(!exported.contains(MARKER));
    }
}
