//! Profile formatter for `tlens analyze`

use console::style;
use itertools::Itertools;
use serde::Serialize;

use crate::cli::output::{Formattable, HumanLayout, OutputFormat, robot_ok, robot_partial};
use crate::documents::{DocumentFailure, SourceKind, Visibility};
use crate::error::ErrorCode;
use crate::profile::{AnalysisOutcome, CorpusStats, ScoredSkill, summarize_profile};
use crate::scan::DetectionKind;

/// A ranked, optionally truncated view of an analysis outcome.
#[derive(Debug, Clone)]
pub struct ProfileView<'a> {
    pub outcome: &'a AnalysisOutcome,
    /// Maximum number of skills to show (`None` shows all)
    pub limit: Option<usize>,
}

/// Serializable skill row for JSON/JSONL output
#[derive(Debug, Clone, Serialize)]
struct SkillRow {
    name: String,
    category: String,
    confidence: f64,
    detection_kinds: Vec<DetectionKind>,
    distinct_sources: usize,
    occurrences: usize,
    public_evidence_available: bool,
    evidence: Vec<EvidenceRow>,
}

#[derive(Debug, Clone, Serialize)]
struct EvidenceRow {
    snippet: String,
    document_id: String,
    source_kind: SourceKind,
    visibility: Visibility,
}

#[derive(Debug, Clone, Serialize)]
struct ProfileJson<'a> {
    subject_id: &'a str,
    generated_at: String,
    registry_fingerprint: &'a str,
    summary: String,
    corpus_stats: CorpusStats,
    category_coverage: &'a std::collections::BTreeMap<String, usize>,
    skills: Vec<SkillRow>,
    failures: &'a [DocumentFailure],
}

impl<'a> ProfileView<'a> {
    pub const fn new(outcome: &'a AnalysisOutcome) -> Self {
        Self {
            outcome,
            limit: None,
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn shown(&self) -> Vec<&'a ScoredSkill> {
        let ranked = self.outcome.profile.ranked();
        match self.limit {
            Some(limit) => ranked.into_iter().take(limit).collect(),
            None => ranked,
        }
    }

    fn rows(&self) -> Vec<SkillRow> {
        self.shown().into_iter().map(skill_row).collect()
    }

    fn to_json_data(&self) -> ProfileJson<'a> {
        let profile = &self.outcome.profile;
        ProfileJson {
            subject_id: &profile.subject_id,
            generated_at: profile.generated_at.to_rfc3339(),
            registry_fingerprint: &profile.registry_fingerprint,
            summary: summarize_profile(profile),
            corpus_stats: profile.corpus_stats,
            category_coverage: &profile.category_coverage,
            skills: self.rows(),
            failures: &self.outcome.failures,
        }
    }

    fn format_json(&self) -> String {
        let data = self.to_json_data();
        let rendered = if self.outcome.is_partial() {
            let failed = self.outcome.failures.len();
            // Load failures never became documents; only rejections count against the corpus.
            let rejected = self
                .outcome
                .failures
                .iter()
                .filter(|f| f.code == ErrorCode::DocumentRejected)
                .count();
            let completed = self
                .outcome
                .profile
                .corpus_stats
                .document_count
                .saturating_sub(rejected);
            let warnings = self
                .outcome
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.document_id, f.reason))
                .collect();
            serde_json::to_string_pretty(&robot_partial(data, completed, failed, warnings))
        } else {
            serde_json::to_string_pretty(&robot_ok(data))
        };
        rendered.unwrap_or_default()
    }

    fn format_jsonl(&self) -> String {
        self.rows()
            .iter()
            .filter_map(|row| serde_json::to_string(row).ok())
            .join("\n")
    }

    fn format_plain(&self) -> String {
        self.shown()
            .iter()
            .map(|s| format!("{}: {:.3}", s.skill_name, s.confidence))
            .join("\n")
    }

    fn format_tsv(&self) -> String {
        let mut out = String::from("name\tcategory\tconfidence\tkinds\tsources\toccurrences\n");
        for s in self.shown() {
            out.push_str(&format!(
                "{}\t{}\t{:.4}\t{}\t{}\t{}\n",
                s.skill_name,
                s.category,
                s.confidence,
                s.evidence.detection_kinds.iter().join(","),
                s.evidence.distinct_source_count,
                s.evidence.occurrence_count,
            ));
        }
        out
    }

    fn format_human(&self) -> String {
        let profile = &self.outcome.profile;
        let stats = &profile.corpus_stats;
        let mut layout = HumanLayout::new();
        layout
            .title(&format!("Skill profile: {}", profile.subject_id))
            .kv(
                "Documents",
                &format!("{} ({} public)", stats.document_count, stats.public_document_count),
            )
            .kv("Registry", &profile.registry_fingerprint)
            .blank();

        if profile.is_empty() {
            layout.push_line(format!("{} {}", style("!").yellow(), summarize_profile(profile)));
        } else {
            layout.section("Skills");
            for (i, skill) in self.shown().iter().enumerate() {
                layout.push_line(format!(
                    "{}. {} {} {} {}",
                    style(i + 1).dim(),
                    style(&skill.skill_name).cyan().bold(),
                    style(format!("[{:.2}]", skill.confidence)).dim(),
                    skill.category,
                    style(skill.evidence.detection_kinds.iter().join("+")).dim(),
                ));
                if let Some(hit) = skill.evidence.hits.first() {
                    let marker = if hit.visibility.is_public() {
                        String::new()
                    } else {
                        format!(" {}", style("[private]").red())
                    };
                    layout.push_line(format!("   {}{marker}", style(&hit.snippet).dim()));
                }
            }
            let hidden = profile.skills.len().saturating_sub(self.shown().len());
            if hidden > 0 {
                layout.push_line(format!("   {}", style(format!("… {hidden} more")).dim()));
            }
            layout.blank().section("Summary").push_line(summarize_profile(profile));
        }

        if !self.outcome.failures.is_empty() {
            layout.blank().section("Skipped documents");
            for failure in &self.outcome.failures {
                layout.bullet(&format!(
                    "{} {} {}",
                    failure.document_id,
                    style(failure.code.code_string()).yellow(),
                    failure.reason
                ));
            }
        }

        layout.build()
    }
}

fn skill_row(skill: &ScoredSkill) -> SkillRow {
    SkillRow {
        name: skill.skill_name.clone(),
        category: skill.category.clone(),
        confidence: skill.confidence,
        detection_kinds: skill.evidence.detection_kinds.iter().copied().collect(),
        distinct_sources: skill.evidence.distinct_source_count,
        occurrences: skill.evidence.occurrence_count,
        public_evidence_available: skill.public_evidence_available,
        evidence: skill
            .evidence
            .hits
            .iter()
            .map(|hit| EvidenceRow {
                snippet: hit.snippet.clone(),
                document_id: hit.document_id.clone(),
                source_kind: hit.source_kind,
                visibility: hit.visibility,
            })
            .collect(),
    }
}

impl Formattable for ProfileView<'_> {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => self.format_json(),
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}
