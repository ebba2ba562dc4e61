use proptest::prelude::*;

use talentlens::documents::{SourceDocument, SourceKind, Visibility};
use talentlens::profile::{ProfileBuilder, ProfileOptions};
use talentlens::registry::Registry;
use talentlens::scoring::ConfidenceScorer;
use talentlens::test_utils::fixtures::fixed_timestamp;

use crate::strategies::{arb_corpus, arb_text};

fn builder(registry: &Registry) -> ProfileBuilder<'_> {
    ProfileBuilder::new(registry, ConfidenceScorer::default(), ProfileOptions::default())
}

proptest! {
    #[test]
    fn confidence_is_bounded(docs in arb_corpus(8)) {
        let registry = Registry::builtin().unwrap();
        let profile = builder(&registry)
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap()
            .profile;
        for skill in profile.skills.values() {
            prop_assert!(skill.confidence > 0.0 && skill.confidence <= 1.0, "{} = {}", skill.skill_name, skill.confidence);
            prop_assert!(!skill.evidence.hits.is_empty());
            prop_assert!(skill.evidence.hits.len() <= 5);
            prop_assert!(skill.evidence.distinct_source_count <= docs.len());
        }
    }

    #[test]
    fn every_skill_has_its_registry_category(docs in arb_corpus(8)) {
        let registry = Registry::builtin().unwrap();
        let profile = builder(&registry)
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap()
            .profile;
        for skill in profile.skills.values() {
            prop_assert_eq!(registry.category_of(&skill.skill_name), Some(skill.category.as_str()));
        }
        let covered: usize = profile.category_coverage.values().sum();
        prop_assert_eq!(covered, profile.skills.len());
    }

    #[test]
    fn another_supporting_document_never_lowers_confidence(
        docs in arb_corpus(6),
        extra in arb_text(),
    ) {
        let registry = Registry::builtin().unwrap();
        let before = builder(&registry)
            .build_profile_at("s", &docs, fixed_timestamp())
            .unwrap()
            .profile;

        let mut grown = docs.clone();
        grown.push(SourceDocument::new("extra", extra, SourceKind::Other, Visibility::Private));
        let after = builder(&registry)
            .build_profile_at("s", &grown, fixed_timestamp())
            .unwrap()
            .profile;

        for (name, skill) in &before.skills {
            let grown_skill = &after.skills[name];
            prop_assert!(grown_skill.confidence + 1e-12 >= skill.confidence, "{name} dropped");
        }
    }
}
