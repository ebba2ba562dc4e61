//! Evidence aggregation: per-document hits merged into one evidence set per skill.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::documents::{SourceKind, Visibility};
use crate::scan::{DetectionKind, SkillHit};

/// A retained snippet for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceHit {
    pub snippet: String,
    pub document_id: String,
    pub source_kind: SourceKind,
    pub visibility: Visibility,
    pub detection_kind: DetectionKind,
}

impl From<SkillHit> for EvidenceHit {
    fn from(hit: SkillHit) -> Self {
        Self {
            snippet: hit.snippet,
            document_id: hit.document_id,
            source_kind: hit.source_kind,
            visibility: hit.visibility,
            detection_kind: hit.detection_kind,
        }
    }
}

/// Everything the corpus says about one skill.
///
/// `hits` holds at most the aggregator's snippet cap; the counters are
/// computed over every hit, so scoring sees the true totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillEvidence {
    pub skill_name: String,
    pub detection_kinds: BTreeSet<DetectionKind>,
    pub hits: Vec<EvidenceHit>,
    pub distinct_source_count: usize,
    pub occurrence_count: usize,
    pub public_occurrence_count: usize,
}

impl SkillEvidence {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occurrence_count == 0
    }

    /// True when at least one contributing hit came from a public document.
    #[must_use]
    pub const fn has_public_evidence(&self) -> bool {
        self.public_occurrence_count > 0
    }

    pub fn public_hits(&self) -> impl Iterator<Item = &EvidenceHit> {
        self.hits.iter().filter(|hit| hit.visibility.is_public())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvidenceAggregator {
    max_snippets: usize,
}

impl Default for EvidenceAggregator {
    fn default() -> Self {
        Self { max_snippets: 5 }
    }
}

impl EvidenceAggregator {
    #[must_use]
    pub const fn new(max_snippets: usize) -> Self {
        Self { max_snippets }
    }

    /// Group hits by skill across all documents.
    ///
    /// `hits_by_document` must be in input document order; that order is
    /// what makes snippet selection deterministic.
    #[must_use]
    pub fn aggregate(&self, hits_by_document: Vec<Vec<SkillHit>>) -> BTreeMap<String, SkillEvidence> {
        let mut grouped: BTreeMap<String, Vec<SkillHit>> = BTreeMap::new();
        for hits in hits_by_document {
            for hit in hits {
                grouped.entry(hit.skill_name.clone()).or_default().push(hit);
            }
        }

        grouped
            .into_iter()
            .map(|(skill, hits)| {
                let evidence = self.collapse(skill.clone(), hits);
                (skill, evidence)
            })
            .collect()
    }

    fn collapse(&self, skill_name: String, hits: Vec<SkillHit>) -> SkillEvidence {
        let detection_kinds = hits.iter().map(|h| h.detection_kind).collect();
        let distinct_source_count = hits
            .iter()
            .map(|h| h.document_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let occurrence_count = hits.len();
        let public_occurrence_count = hits.iter().filter(|h| h.visibility.is_public()).count();

        let keep = select_representatives(&hits, self.max_snippets);
        let hits = hits
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep.contains(idx))
            .map(|(_, hit)| EvidenceHit::from(hit))
            .collect();

        SkillEvidence {
            skill_name,
            detection_kinds,
            hits,
            distinct_source_count,
            occurrence_count,
            public_occurrence_count,
        }
    }
}

/// Pick which hits to keep when there are more than `cap`.
///
/// One hit per document first (in document order), then the remaining
/// slots in original order. If that leaves no public snippet while a public
/// hit exists, the last pick is traded for the first public hit.
fn select_representatives(hits: &[SkillHit], cap: usize) -> BTreeSet<usize> {
    if hits.len() <= cap {
        return (0..hits.len()).collect();
    }

    let mut keep = BTreeSet::new();
    let mut seen_docs = HashSet::new();
    for (idx, hit) in hits.iter().enumerate() {
        if keep.len() == cap {
            break;
        }
        if seen_docs.insert(hit.document_id.as_str()) {
            keep.insert(idx);
        }
    }
    for idx in 0..hits.len() {
        if keep.len() == cap {
            break;
        }
        keep.insert(idx);
    }

    let has_public = keep.iter().any(|&idx| hits[idx].visibility.is_public());
    if !has_public {
        if let Some(public_idx) = hits.iter().position(|h| h.visibility.is_public()) {
            if let Some(&last) = keep.iter().next_back() {
                keep.remove(&last);
                keep.insert(public_idx);
            }
        }
    }

    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(skill: &str, doc: &str, visibility: Visibility, position: usize) -> SkillHit {
        SkillHit {
            skill_name: skill.to_string(),
            detection_kind: DetectionKind::Explicit,
            matched_text: skill.to_lowercase(),
            snippet: format!("{doc}@{position}"),
            position,
            document_id: doc.to_string(),
            source_kind: SourceKind::Other,
            visibility,
        }
    }

    #[test]
    fn groups_by_skill_and_counts_sources() {
        let aggregator = EvidenceAggregator::default();
        let evidence = aggregator.aggregate(vec![
            vec![
                hit("Python", "a", Visibility::Private, 0),
                hit("Python", "a", Visibility::Private, 10),
                hit("Docker", "a", Visibility::Private, 20),
            ],
            vec![hit("Python", "b", Visibility::Public, 0)],
        ]);

        let python = &evidence["Python"];
        assert_eq!(python.occurrence_count, 3);
        assert_eq!(python.distinct_source_count, 2);
        assert_eq!(python.hits.len(), 3);
        assert!(python.has_public_evidence());
        assert_eq!(python.public_hits().count(), 1);

        let docker = &evidence["Docker"];
        assert_eq!(docker.distinct_source_count, 1);
        assert!(!docker.has_public_evidence());
    }

    #[test]
    fn preserves_document_order() {
        let aggregator = EvidenceAggregator::default();
        let evidence = aggregator.aggregate(vec![
            vec![hit("Git", "first", Visibility::Public, 5)],
            vec![hit("Git", "second", Visibility::Public, 1)],
        ]);
        let docs: Vec<_> = evidence["Git"].hits.iter().map(|h| h.document_id.as_str()).collect();
        assert_eq!(docs, vec!["first", "second"]);
    }

    #[test]
    fn cap_keeps_true_occurrence_count() {
        let aggregator = EvidenceAggregator::new(2);
        let hits = (0..7).map(|i| hit("SQL", "a", Visibility::Private, i)).collect();
        let evidence = aggregator.aggregate(vec![hits]);
        let sql = &evidence["SQL"];
        assert_eq!(sql.hits.len(), 2);
        assert_eq!(sql.occurrence_count, 7);
        assert!(sql.distinct_source_count <= sql.occurrence_count);
    }

    #[test]
    fn cap_prefers_source_diversity() {
        let aggregator = EvidenceAggregator::new(3);
        let evidence = aggregator.aggregate(vec![
            (0..5).map(|i| hit("AWS", "a", Visibility::Private, i)).collect(),
            vec![hit("AWS", "b", Visibility::Private, 0)],
            vec![hit("AWS", "c", Visibility::Private, 0)],
        ]);
        let docs: Vec<_> = evidence["AWS"].hits.iter().map(|h| h.document_id.as_str()).collect();
        assert_eq!(docs, vec!["a", "b", "c"]);
    }

    #[test]
    fn cap_never_hides_all_public_evidence() {
        let aggregator = EvidenceAggregator::new(2);
        let mut private: Vec<_> = (0..4).map(|i| hit("Scrum", "p1", Visibility::Private, i)).collect();
        private.push(hit("Scrum", "p2", Visibility::Private, 0));
        let evidence = aggregator.aggregate(vec![
            private,
            vec![hit("Scrum", "p3", Visibility::Private, 0)],
            vec![hit("Scrum", "pub", Visibility::Public, 0)],
        ]);
        let scrum = &evidence["Scrum"];
        assert_eq!(scrum.hits.len(), 2);
        assert_eq!(scrum.public_hits().count(), 1);
        assert_eq!(scrum.hits[0].document_id, "p1");
        assert_eq!(scrum.hits[1].document_id, "pub");
    }

    #[test]
    fn empty_input_gives_empty_map() {
        assert!(EvidenceAggregator::default().aggregate(Vec::new()).is_empty());
        assert!(EvidenceAggregator::default().aggregate(vec![Vec::new()]).is_empty());
    }
}
