//! Exchange format for a [`SkillProfile`].
//!
//! Confidence is exported as computed from all evidence. Snippets are only
//! exported from public documents; a skill with no public evidence has no
//! `evidence` key at all.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chrono::SecondsFormat;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::{CorpusStats, ScoredSkill, SkillProfile};
use crate::documents::SourceKind;
use crate::error::{LensError, Result};
use crate::scan::DetectionKind;

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Decimal places kept for confidence values.
    pub precision: u32,
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            precision: 3,
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileExport {
    pub subject_id: String,
    pub generated_at: String,
    pub skills: Vec<ExportedSkill>,
    pub category_coverage: BTreeMap<String, usize>,
    pub corpus_stats: CorpusStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedSkill {
    pub name: String,
    pub category: String,
    pub confidence: f64,
    pub detection_kinds: Vec<DetectionKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<ExportedEvidence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedEvidence {
    pub snippet: String,
    pub source_kind: SourceKind,
}

/// Project a profile onto the exchange shape, skills ranked.
#[must_use]
pub fn export_profile(profile: &SkillProfile, options: ExportOptions) -> ProfileExport {
    ProfileExport {
        subject_id: profile.subject_id.clone(),
        generated_at: profile
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        skills: profile
            .ranked()
            .into_iter()
            .map(|skill| export_skill(skill, options.precision))
            .collect(),
        category_coverage: profile.category_coverage.clone(),
        corpus_stats: profile.corpus_stats,
    }
}

fn export_skill(skill: &ScoredSkill, precision: u32) -> ExportedSkill {
    let evidence = if skill.public_evidence_available {
        skill
            .evidence
            .public_hits()
            .map(|hit| ExportedEvidence {
                snippet: hit.snippet.clone(),
                source_kind: hit.source_kind,
            })
            .collect()
    } else {
        Vec::new()
    };

    ExportedSkill {
        name: skill.skill_name.clone(),
        category: skill.category.clone(),
        confidence: round_to(skill.confidence, precision),
        detection_kinds: skill.evidence.detection_kinds.iter().copied().collect(),
        evidence,
    }
}

#[allow(clippy::cast_possible_wrap)]
fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(12) as i32);
    (value * factor).round() / factor
}

/// Serialize the exchange document.
pub fn to_json(profile: &SkillProfile, options: ExportOptions) -> Result<String> {
    let export = export_profile(profile, options);
    let json = if options.pretty {
        serde_json::to_string_pretty(&export)?
    } else {
        serde_json::to_string(&export)?
    };
    Ok(json)
}

/// Write an export file atomically (temp file in the same directory, then rename).
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path)
        .map_err(|err| LensError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Visibility;
    use crate::profile::{ProfileBuilder, ProfileOptions};
    use crate::registry::Registry;
    use crate::scoring::ConfidenceScorer;
    use crate::test_utils::fixtures;

    fn example_profile() -> SkillProfile {
        let registry = Registry::builtin().unwrap();
        ProfileBuilder::new(&registry, ConfidenceScorer::default(), ProfileOptions::default())
            .build_profile_at("candidate-1", &fixtures::example_corpus(), fixtures::fixed_timestamp())
            .unwrap()
            .profile
    }

    #[test]
    fn private_only_skill_has_no_evidence_key() {
        let profile = example_profile();
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&profile, ExportOptions::default()).unwrap()).unwrap();

        let skills = json["skills"].as_array().unwrap();
        let stakeholder = skills
            .iter()
            .find(|s| s["name"] == "Stakeholder Management")
            .unwrap();
        assert!(stakeholder.get("evidence").is_none());
        assert!(stakeholder["confidence"].as_f64().unwrap() > 0.0);
        assert_eq!(stakeholder["detection_kinds"][0], "implicit");

        let python = skills.iter().find(|s| s["name"] == "Python").unwrap();
        assert_eq!(python["evidence"][0]["source_kind"], "resume");
    }

    #[test]
    fn export_never_contains_private_snippets() {
        let profile = example_profile();
        let text = to_json(&profile, ExportOptions::default()).unwrap();
        assert!(!text.contains("excellent stakeholder management"));
    }

    #[test]
    fn export_confidence_is_rounded_not_filtered() {
        let profile = example_profile();
        let export = export_profile(&profile, ExportOptions { precision: 2, pretty: false });
        let stakeholder = export
            .skills
            .iter()
            .find(|s| s.name == "Stakeholder Management")
            .unwrap();
        let raw = profile.skills["Stakeholder Management"].confidence;
        assert!((stakeholder.confidence - round_to(raw, 2)).abs() < 1e-12);
    }

    #[test]
    fn export_top_level_shape() {
        let export = export_profile(&example_profile(), ExportOptions::default());
        assert_eq!(export.generated_at, "2026-01-15T09:30:00Z");
        assert_eq!(export.corpus_stats.document_count, 2);
        insta::assert_snapshot!(export.skills.len().to_string(), @"4");
    }

    #[test]
    fn mixed_visibility_exports_only_public_hits() {
        let mut profile = example_profile();
        let python = profile.skills.get_mut("Python").unwrap();
        let mut private = python.evidence.hits[0].clone();
        private.visibility = Visibility::Private;
        private.snippet = "internal only".to_string();
        python.evidence.hits.push(private);

        let text = to_json(&profile, ExportOptions::default()).unwrap();
        assert!(!text.contains("internal only"));
    }

    #[test]
    fn write_export_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        write_export(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn round_to_precision() {
        assert!((round_to(0.123_456, 3) - 0.123).abs() < 1e-12);
        assert!((round_to(0.5, 0) - 1.0).abs() < 1e-12);
    }
}
