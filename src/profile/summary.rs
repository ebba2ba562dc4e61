//! Framework alignment and the one-paragraph profile summary.

use serde::Serialize;

use super::SkillProfile;
use crate::registry::{Registry, normalize_skill};

/// How much of one framework category a profile covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAlignment {
    pub category: String,
    /// Covered framework skills, sorted.
    pub covered: Vec<String>,
    /// `covered / target_total`, 0 for an empty category.
    pub coverage: f64,
    pub target_total: usize,
}

impl SkillProfile {
    /// Coverage of every framework category, in registry order.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn framework_alignment(&self, registry: &Registry) -> Vec<CategoryAlignment> {
        registry
            .categories()
            .iter()
            .map(|category| {
                let mut covered: Vec<String> = category
                    .skills
                    .iter()
                    .filter(|skill| {
                        let key = normalize_skill(skill);
                        self.skills
                            .values()
                            .any(|s| normalize_skill(&s.skill_name) == key)
                    })
                    .cloned()
                    .collect();
                covered.sort();

                let target_total = category.skills.len();
                let coverage = if target_total == 0 {
                    0.0
                } else {
                    covered.len() as f64 / target_total as f64
                };

                CategoryAlignment {
                    category: category.name.clone(),
                    covered,
                    coverage,
                    target_total,
                }
            })
            .collect()
    }
}

/// Human-readable paragraph describing a profile.
#[must_use]
pub fn summarize_profile(profile: &SkillProfile) -> String {
    if profile.is_empty() {
        return "No skills detected yet. Add more sources to unlock hidden strengths.".to_string();
    }

    let top = profile
        .ranked()
        .iter()
        .take(5)
        .map(|s| s.skill_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let categories = profile
        .category_coverage
        .iter()
        .map(|(category, count)| format!("{category} ({count})"))
        .collect::<Vec<_>>()
        .join(", ");
    let stats = &profile.corpus_stats;

    format!(
        "Identified {} explicit and {} implicit skills across {} sources. \
         Top strengths: {top}. Coverage spans {categories} with an average confidence of {:.2}.",
        stats.explicit_count,
        stats.implicit_count,
        stats.document_count,
        profile.average_confidence(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileBuilder, ProfileOptions};
    use crate::scoring::ConfidenceScorer;
    use crate::test_utils::fixtures;

    fn build(registry: &Registry, docs: &[crate::documents::SourceDocument]) -> SkillProfile {
        ProfileBuilder::new(registry, ConfidenceScorer::default(), ProfileOptions::default())
            .build_profile_at("s", docs, fixtures::fixed_timestamp())
            .unwrap()
            .profile
    }

    #[test]
    fn empty_profile_summary() {
        let registry = Registry::builtin().unwrap();
        let profile = build(&registry, &[]);
        insta::assert_snapshot!(
            summarize_profile(&profile),
            @"No skills detected yet. Add more sources to unlock hidden strengths."
        );
    }

    #[test]
    fn summary_mentions_counts_and_top_skills() {
        let registry = Registry::builtin().unwrap();
        let profile = build(&registry, &fixtures::example_corpus());
        let summary = summarize_profile(&profile);
        assert!(summary.starts_with("Identified 2 explicit and 2 implicit skills across 2 sources."));
        assert!(summary.contains("Python"));
        assert!(summary.contains("Technical Foundation (2)"));
    }

    #[test]
    fn alignment_covers_every_category() {
        let registry = Registry::builtin().unwrap();
        let profile = build(&registry, &fixtures::example_corpus());
        let alignment = profile.framework_alignment(&registry);
        assert_eq!(alignment.len(), registry.categories().len());

        let tech = &alignment[0];
        assert_eq!(tech.category, "Technical Foundation");
        assert_eq!(tech.covered, vec!["Docker".to_string(), "Python".to_string()]);
        assert_eq!(tech.target_total, 15);
        assert!((tech.coverage - 2.0 / 15.0).abs() < 1e-12);

        let data = &alignment[1];
        assert!(data.covered.is_empty());
        assert!(data.coverage.abs() < f64::EPSILON);
    }
}
