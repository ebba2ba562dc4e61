//! Confidence scoring.
//!
//! Confidence blends three bounded signals:
//! - occurrence: `min(1, occurrence_count / K)`
//! - diversity: `min(1, distinct_source_count / D)`
//! - detection kind: strongest kind seen (explicit outranks implicit)
//!
//! The weighted sum is clamped to `[0, 1]`. Weights are configuration, not
//! learned, and identical evidence always gives an identical score.

use serde::Serialize;

use crate::evidence::SkillEvidence;
use crate::scan::DetectionKind;

/// Relative weight of each signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    /// Weight for repeated mentions (default: 0.25).
    pub occurrence: f64,
    /// Weight for distinct sources (default: 0.45).
    pub diversity: f64,
    /// Weight for detection kind (default: 0.30).
    pub detection: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            occurrence: 0.25,
            diversity: 0.45,
            detection: 0.30,
        }
    }
}

impl ScoringWeights {
    #[must_use]
    pub const fn new(occurrence: f64, diversity: f64, detection: f64) -> Self {
        Self {
            occurrence,
            diversity,
            detection,
        }
    }

    /// Normalize weights to sum to 1.0.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let sum = self.occurrence + self.diversity + self.detection;
        if sum <= 0.0 || !sum.is_finite() {
            return *self;
        }
        Self {
            occurrence: self.occurrence / sum,
            diversity: self.diversity / sum,
            detection: self.detection / sum,
        }
    }
}

/// Saturation points and per-kind strengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringParams {
    /// Mentions at which the occurrence signal saturates (K).
    pub occurrence_saturation: f64,
    /// Sources at which the diversity signal saturates.
    pub diversity_saturation: f64,
    pub explicit_strength: f64,
    pub implicit_strength: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            occurrence_saturation: 5.0,
            diversity_saturation: 3.0,
            explicit_strength: 1.0,
            implicit_strength: 0.6,
        }
    }
}

/// Per-signal values before weighting, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub occurrence: f64,
    pub diversity: f64,
    pub detection: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer {
    weights: ScoringWeights,
    params: ScoringParams,
}

impl ConfidenceScorer {
    /// Weights are normalized here but not checked for ordering;
    /// [`Config::validate`](crate::config::Config::validate) rejects
    /// configurations where occurrence outweighs diversity or implicit
    /// outweighs explicit.
    #[must_use]
    pub fn new(weights: ScoringWeights, params: ScoringParams) -> Self {
        Self {
            weights: weights.normalized(),
            params,
        }
    }

    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Confidence for a skill, or `None` when there is no evidence to score.
    #[must_use]
    pub fn score(&self, evidence: &SkillEvidence) -> Option<f64> {
        if evidence.is_empty() {
            return None;
        }
        let breakdown = self.breakdown(evidence);
        Some(self.weighted_score(&breakdown))
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn breakdown(&self, evidence: &SkillEvidence) -> ScoreBreakdown {
        ScoreBreakdown {
            occurrence: saturate(
                evidence.occurrence_count as f64,
                self.params.occurrence_saturation,
            ),
            diversity: saturate(
                evidence.distinct_source_count as f64,
                self.params.diversity_saturation,
            ),
            detection: evidence
                .detection_kinds
                .iter()
                .map(|kind| self.kind_strength(*kind))
                .fold(0.0, f64::max),
        }
    }

    const fn kind_strength(&self, kind: DetectionKind) -> f64 {
        match kind {
            DetectionKind::Explicit => self.params.explicit_strength,
            DetectionKind::Implicit => self.params.implicit_strength,
        }
    }

    fn weighted_score(&self, breakdown: &ScoreBreakdown) -> f64 {
        let raw = self.weights.occurrence * breakdown.occurrence
            + self.weights.diversity * breakdown.diversity
            + self.weights.detection * breakdown.detection;
        raw.clamp(0.0, 1.0)
    }
}

fn saturate(value: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 1.0;
    }
    (value / limit).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn evidence(occurrences: usize, sources: usize, kinds: &[DetectionKind]) -> SkillEvidence {
        SkillEvidence {
            skill_name: "Python".to_string(),
            detection_kinds: kinds.iter().copied().collect::<BTreeSet<_>>(),
            hits: Vec::new(),
            distinct_source_count: sources,
            occurrence_count: occurrences,
            public_occurrence_count: 0,
        }
    }

    #[test]
    fn weights_normalize() {
        let w = ScoringWeights::new(1.0, 1.0, 2.0).normalized();
        assert!((w.occurrence - 0.25).abs() < 1e-12);
        assert!((w.detection - 0.5).abs() < 1e-12);
        let zero = ScoringWeights::new(0.0, 0.0, 0.0).normalized();
        assert!(zero.occurrence.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_evidence_is_not_scored() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(&evidence(0, 0, &[])), None);
    }

    #[test]
    fn diversity_beats_repetition() {
        let scorer = ConfidenceScorer::new(ScoringWeights::default(), ScoringParams::default());
        let two_docs = scorer.score(&evidence(2, 2, &[DetectionKind::Explicit])).unwrap();
        let one_doc_thrice = scorer.score(&evidence(3, 1, &[DetectionKind::Explicit])).unwrap();
        assert!(two_docs > one_doc_thrice, "{two_docs} <= {one_doc_thrice}");
    }

    #[test]
    fn explicit_outranks_implicit() {
        let scorer = ConfidenceScorer::new(ScoringWeights::default(), ScoringParams::default());
        let explicit = scorer.score(&evidence(1, 1, &[DetectionKind::Explicit])).unwrap();
        let implicit = scorer.score(&evidence(1, 1, &[DetectionKind::Implicit])).unwrap();
        let both = scorer
            .score(&evidence(1, 1, &[DetectionKind::Explicit, DetectionKind::Implicit]))
            .unwrap();
        assert!(explicit > implicit);
        assert!((both - explicit).abs() < f64::EPSILON);
    }

    #[test]
    fn score_saturates_at_one() {
        let scorer = ConfidenceScorer::new(ScoringWeights::default(), ScoringParams::default());
        let score = scorer.score(&evidence(1000, 50, &[DetectionKind::Explicit])).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn breakdown_components_are_bounded() {
        let scorer = ConfidenceScorer::default();
        let b = scorer.breakdown(&evidence(2, 1, &[DetectionKind::Implicit]));
        assert!((b.occurrence - 0.4).abs() < 1e-12);
        assert!((b.diversity - 1.0 / 3.0).abs() < 1e-12);
        assert!((b.detection - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_saturation_is_treated_as_saturated() {
        assert!((saturate(0.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }
}
