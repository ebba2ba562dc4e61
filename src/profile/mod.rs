//! Framework mapping and profile assembly.
//!
//! [`ProfileBuilder`] drives one analysis run: scan every document, merge
//! hits into evidence, score each skill, attach its framework category and
//! collect corpus statistics. The resulting [`SkillProfile`] keeps all
//! evidence, private included; redaction happens in [`export`].

pub mod export;
pub mod summary;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::documents::{DocumentFailure, SourceDocument, validate_batch};
use crate::error::{LensError, Result};
use crate::evidence::{EvidenceAggregator, SkillEvidence};
use crate::registry::Registry;
use crate::scan::{DetectionKind, ScanOptions, Scanner};
use crate::scoring::{ConfidenceScorer, ScoringParams, ScoringWeights};

pub use summary::{CategoryAlignment, summarize_profile};

/// A detected skill with its score and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSkill {
    pub skill_name: String,
    pub category: String,
    pub confidence: f64,
    pub evidence: SkillEvidence,
    pub public_evidence_available: bool,
}

impl ScoredSkill {
    #[must_use]
    pub fn has_kind(&self, kind: DetectionKind) -> bool {
        self.evidence.detection_kinds.contains(&kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub document_count: usize,
    pub public_document_count: usize,
    /// Distinct skills with at least one explicit hit.
    pub explicit_count: usize,
    /// Distinct skills with at least one implicit hit.
    pub implicit_count: usize,
}

/// The result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillProfile {
    pub subject_id: String,
    /// Keyed by skill name. Iteration order is unspecified; use [`SkillProfile::ranked`].
    pub skills: HashMap<String, ScoredSkill>,
    pub category_coverage: BTreeMap<String, usize>,
    pub corpus_stats: CorpusStats,
    pub generated_at: DateTime<Utc>,
    pub registry_fingerprint: String,
}

impl SkillProfile {
    /// Skills by confidence (highest first), then name.
    #[must_use]
    pub fn ranked(&self) -> Vec<&ScoredSkill> {
        let mut skills: Vec<_> = self.skills.values().collect();
        skills.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });
        skills
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_confidence(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        self.skills.values().map(|s| s.confidence).sum::<f64>() / self.skills.len() as f64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// A profile plus the documents that could not be scanned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub profile: SkillProfile,
    pub failures: Vec<DocumentFailure>,
}

impl AnalysisOutcome {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileOptions {
    pub scan: ScanOptions,
    pub max_snippets: usize,
    pub parallel: bool,
    /// Minimum batch size before scanning goes parallel.
    pub parallel_threshold: usize,
    /// Scored skills below this are left out of `skills`.
    pub min_confidence: f64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            max_snippets: 5,
            parallel: true,
            parallel_threshold: 8,
            min_confidence: 0.0,
        }
    }
}

pub struct ProfileBuilder<'r> {
    registry: &'r Registry,
    scorer: ConfidenceScorer,
    options: ProfileOptions,
}

impl<'r> ProfileBuilder<'r> {
    #[must_use]
    pub const fn new(registry: &'r Registry, scorer: ConfidenceScorer, options: ProfileOptions) -> Self {
        Self {
            registry,
            scorer,
            options,
        }
    }

    #[must_use]
    pub fn from_config(registry: &'r Registry, config: &Config) -> Self {
        let scoring = &config.scoring;
        let scorer = ConfidenceScorer::new(
            ScoringWeights::new(
                scoring.occurrence_weight,
                scoring.diversity_weight,
                scoring.detection_weight,
            ),
            ScoringParams {
                occurrence_saturation: scoring.occurrence_saturation,
                diversity_saturation: scoring.diversity_saturation,
                explicit_strength: scoring.explicit_strength,
                implicit_strength: scoring.implicit_strength,
            },
        );
        let options = ProfileOptions {
            scan: ScanOptions {
                snippet_window: config.scan.snippet_window,
                max_document_bytes: config.scan.max_document_bytes,
            },
            max_snippets: config.evidence.max_snippets,
            parallel: config.scan.parallel,
            parallel_threshold: config.scan.parallel_threshold,
            min_confidence: scoring.min_confidence,
        };
        Self::new(registry, scorer, options)
    }

    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.options.min_confidence = min_confidence;
        self
    }

    /// Build a profile stamped with the current time.
    pub fn build_profile(&self, subject_id: &str, documents: &[SourceDocument]) -> Result<AnalysisOutcome> {
        self.build_profile_at(subject_id, documents, Utc::now())
    }

    /// Build a profile with an explicit timestamp.
    ///
    /// Fails on duplicate or blank document ids, and when a detected skill
    /// has no category. A document the scanner rejects is reported in
    /// `failures` and the rest of the corpus is still scored.
    pub fn build_profile_at(
        &self,
        subject_id: &str,
        documents: &[SourceDocument],
        generated_at: DateTime<Utc>,
    ) -> Result<AnalysisOutcome> {
        validate_batch(documents)?;

        let scanner = Scanner::new(self.registry, self.options.scan);
        let parallel = self.options.parallel && documents.len() >= self.options.parallel_threshold;

        let mut failures = Vec::new();
        let mut hits_by_document = Vec::with_capacity(documents.len());
        for (document, result) in documents.iter().zip(scanner.scan_batch(documents, parallel)) {
            match result {
                Ok(hits) => hits_by_document.push(hits),
                Err(err) => {
                    warn!(document = %document.id, error = %err, "document skipped");
                    failures.push(DocumentFailure::from_error(document.id.clone(), &err));
                }
            }
        }

        let evidence = EvidenceAggregator::new(self.options.max_snippets).aggregate(hits_by_document);

        let mut explicit_count = 0;
        let mut implicit_count = 0;
        let mut skills = HashMap::with_capacity(evidence.len());
        let mut category_coverage: BTreeMap<String, usize> = BTreeMap::new();

        for (skill_name, evidence) in evidence {
            let Some(confidence) = self.scorer.score(&evidence) else {
                continue;
            };
            let category = self
                .registry
                .category_of(&skill_name)
                .ok_or_else(|| LensError::UncategorizedSkill(skill_name.clone()))?
                .to_string();

            if evidence.detection_kinds.contains(&DetectionKind::Explicit) {
                explicit_count += 1;
            }
            if evidence.detection_kinds.contains(&DetectionKind::Implicit) {
                implicit_count += 1;
            }
            if confidence < self.options.min_confidence {
                continue;
            }

            *category_coverage.entry(category.clone()).or_insert(0) += 1;
            let public_evidence_available = evidence.has_public_evidence();
            skills.insert(
                skill_name.clone(),
                ScoredSkill {
                    skill_name,
                    category,
                    confidence,
                    evidence,
                    public_evidence_available,
                },
            );
        }

        let corpus_stats = CorpusStats {
            document_count: documents.len(),
            public_document_count: documents.iter().filter(|d| d.visibility.is_public()).count(),
            explicit_count,
            implicit_count,
        };

        info!(
            subject = %subject_id,
            documents = corpus_stats.document_count,
            skills = skills.len(),
            failures = failures.len(),
            "built skill profile"
        );

        Ok(AnalysisOutcome {
            profile: SkillProfile {
                subject_id: subject_id.to_string(),
                skills,
                category_coverage,
                corpus_stats,
                generated_at,
                registry_fingerprint: self.registry.fingerprint().to_string(),
            },
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{SourceKind, Visibility};
    use crate::test_utils::fixtures;

    fn builder(registry: &Registry) -> ProfileBuilder<'_> {
        ProfileBuilder::new(registry, ConfidenceScorer::default(), ProfileOptions::default())
    }

    #[test]
    fn example_corpus_profile() {
        let registry = Registry::builtin().unwrap();
        let outcome = builder(&registry)
            .build_profile("candidate-1", &fixtures::example_corpus())
            .unwrap();
        let profile = &outcome.profile;
        assert!(outcome.failures.is_empty());

        for name in ["Python", "Docker"] {
            let skill = &profile.skills[name];
            assert!(skill.has_kind(DetectionKind::Explicit));
            assert!(skill.public_evidence_available);
        }

        let leadership = &profile.skills["Leadership"];
        assert!(leadership.has_kind(DetectionKind::Implicit));
        assert!(leadership.public_evidence_available);

        let stakeholder = &profile.skills["Stakeholder Management"];
        assert!(stakeholder.has_kind(DetectionKind::Implicit));
        assert!(!stakeholder.public_evidence_available);
        assert!(stakeholder.confidence > 0.0);

        assert_eq!(profile.corpus_stats.document_count, 2);
        assert_eq!(profile.corpus_stats.public_document_count, 1);
        assert_eq!(profile.category_coverage["Technical Foundation"], 2);
        assert_eq!(profile.category_coverage["Product & Delivery"], 1);
        assert_eq!(profile.category_coverage["Leadership & Impact"], 1);
    }

    #[test]
    fn empty_corpus_is_a_valid_profile() {
        let registry = Registry::builtin().unwrap();
        let outcome = builder(&registry).build_profile("nobody", &[]).unwrap();
        assert!(outcome.profile.is_empty());
        assert!(outcome.profile.category_coverage.is_empty());
        assert_eq!(outcome.profile.corpus_stats.document_count, 0);
        assert!(outcome.profile.average_confidence().abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_ids_abort_the_run() {
        let registry = Registry::builtin().unwrap();
        let docs = vec![
            SourceDocument::new("a", "Python", SourceKind::Resume, Visibility::Public),
            SourceDocument::new("a", "Docker", SourceKind::Resume, Visibility::Public),
        ];
        let err = builder(&registry).build_profile("s", &docs).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn rejected_document_is_a_partial_failure() {
        let registry = Registry::builtin().unwrap();
        let docs = vec![
            SourceDocument::new("ok", "Python and SQL", SourceKind::Resume, Visibility::Public),
            SourceDocument::new("bin", "Python\0\0", SourceKind::Other, Visibility::Private),
        ];
        let outcome = builder(&registry).build_profile("s", &docs).unwrap();
        assert!(outcome.is_partial());
        assert_eq!(outcome.failures[0].document_id, "bin");
        assert!(outcome.profile.skills.contains_key("SQL"));
        assert_eq!(outcome.profile.corpus_stats.document_count, 2);
    }

    #[test]
    fn two_sources_beat_three_mentions_in_one() {
        let registry = Registry::builtin().unwrap();
        let b = builder(&registry);
        let spread = b
            .build_profile(
                "s",
                &[
                    SourceDocument::new("a", "Python", SourceKind::Resume, Visibility::Public),
                    SourceDocument::new("b", "Python", SourceKind::Repo, Visibility::Public),
                ],
            )
            .unwrap();
        let repeated = b
            .build_profile(
                "s",
                &[SourceDocument::new(
                    "a",
                    "Python, python and more Python",
                    SourceKind::Resume,
                    Visibility::Public,
                )],
            )
            .unwrap();
        assert!(
            spread.profile.skills["Python"].confidence > repeated.profile.skills["Python"].confidence
        );
    }

    #[test]
    fn confidence_floor_drops_skills_but_not_stats() {
        let registry = Registry::builtin().unwrap();
        let docs = fixtures::example_corpus();
        let all = builder(&registry).build_profile("s", &docs).unwrap().profile;
        let floored = builder(&registry)
            .with_min_confidence(0.99)
            .build_profile("s", &docs)
            .unwrap()
            .profile;
        assert!(floored.skills.len() < all.skills.len());
        assert_eq!(floored.corpus_stats, all.corpus_stats);
    }

    #[test]
    fn ranked_orders_by_confidence_then_name() {
        let registry = Registry::builtin().unwrap();
        let profile = builder(&registry)
            .build_profile("s", &fixtures::mixed_corpus())
            .unwrap()
            .profile;
        let ranked = profile.ranked();
        for pair in ranked.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(
                a.confidence > b.confidence
                    || ((a.confidence - b.confidence).abs() < f64::EPSILON && a.skill_name < b.skill_name)
            );
        }
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let registry = Registry::builtin().unwrap();
        let docs = fixtures::mixed_corpus();
        let at = fixtures::fixed_timestamp();
        let sequential = ProfileBuilder::new(
            &registry,
            ConfidenceScorer::default(),
            ProfileOptions {
                parallel: false,
                ..ProfileOptions::default()
            },
        )
        .build_profile_at("s", &docs, at)
        .unwrap();
        let parallel = ProfileBuilder::new(
            &registry,
            ConfidenceScorer::default(),
            ProfileOptions {
                parallel: true,
                parallel_threshold: 1,
                ..ProfileOptions::default()
            },
        )
        .build_profile_at("s", &docs, at)
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}
