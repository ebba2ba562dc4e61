//! Source documents: the read-only input of an analysis run.
//!
//! Documents arrive from an ingestion step already typed and tagged with a
//! visibility. The engine never changes a document's visibility; evidence
//! from a private document stays private all the way to export.

pub mod load;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LensError, Result};

/// Where a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Resume,
    Profile,
    Repo,
    Internal,
    #[default]
    Other,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Profile => "profile",
            Self::Repo => "repo",
            Self::Internal => "internal",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "resume" | "cv" => Ok(Self::Resume),
            "profile" | "linkedin" => Ok(Self::Profile),
            "repo" | "github" => Ok(Self::Repo),
            "internal" => Ok(Self::Internal),
            "other" => Ok(Self::Other),
            other => Err(LensError::ValidationFailed(format!(
                "unknown source kind '{other}' (expected resume|profile|repo|internal|other)"
            ))),
        }
    }
}

/// Whether evidence from a document may be disclosed in shareable exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(LensError::ValidationFailed(format!(
                "unknown visibility '{other}' (expected public|private)"
            ))),
        }
    }
}

/// One piece of free text supplied for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub source_kind: SourceKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SourceDocument {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_kind: SourceKind,
        visibility: Visibility,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_kind,
            visibility,
            created_at: None,
        }
    }

    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A document that was skipped without aborting the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub document_id: String,
    pub code: ErrorCode,
    pub reason: String,
}

impl DocumentFailure {
    #[must_use]
    pub fn from_error(document_id: impl Into<String>, err: &LensError) -> Self {
        Self {
            document_id: document_id.into(),
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

/// Check the batch-level invariants every run depends on.
///
/// Ids must be present and unique within the batch.
pub fn validate_batch(documents: &[SourceDocument]) -> Result<()> {
    let mut seen = HashSet::with_capacity(documents.len());
    for (idx, doc) in documents.iter().enumerate() {
        if doc.id.trim().is_empty() {
            return Err(LensError::MissingField {
                document: format!("#{idx}"),
                field: "id".to_string(),
            });
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(LensError::DuplicateDocument(doc.id.clone()));
        }
    }
    Ok(())
}

/// Quick statistics about a document batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub count: usize,
    pub by_kind: BTreeMap<SourceKind, usize>,
    pub by_visibility: BTreeMap<Visibility, usize>,
    pub total_words: usize,
    pub avg_words: f64,
}

#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn describe_sources(documents: &[SourceDocument]) -> SourceSummary {
    let mut by_kind = BTreeMap::new();
    let mut by_visibility = BTreeMap::new();
    let mut total_words = 0;

    for doc in documents {
        *by_kind.entry(doc.source_kind).or_insert(0) += 1;
        *by_visibility.entry(doc.visibility).or_insert(0) += 1;
        total_words += doc.word_count();
    }

    let avg_words = if documents.is_empty() {
        0.0
    } else {
        (total_words as f64 / documents.len() as f64 * 10.0).round() / 10.0
    };

    SourceSummary {
        count: documents.len(),
        by_kind,
        by_visibility,
        total_words,
        avg_words,
    }
}

/// Concatenate document texts into one corpus, each under a `[id | kind]` header.
///
/// With `visibility` set, documents of the other visibility are skipped,
/// which gives the shareable (public-only) view of a corpus.
#[must_use]
pub fn merge_sources_text(documents: &[SourceDocument], visibility: Option<Visibility>) -> String {
    documents
        .iter()
        .filter(|doc| visibility.is_none_or(|v| doc.visibility == v))
        .filter(|doc| !doc.is_blank())
        .map(|doc| format!("[{} | {}]\n{}", doc.id, doc.source_kind, doc.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str, kind: SourceKind, visibility: Visibility) -> SourceDocument {
        SourceDocument::new(id, text, kind, visibility)
    }

    #[test]
    fn validate_batch_accepts_unique_ids() {
        let docs = vec![
            doc("a", "x", SourceKind::Resume, Visibility::Public),
            doc("b", "y", SourceKind::Internal, Visibility::Private),
        ];
        assert!(validate_batch(&docs).is_ok());
    }

    #[test]
    fn validate_batch_rejects_duplicate_ids() {
        let docs = vec![
            doc("a", "x", SourceKind::Resume, Visibility::Public),
            doc("a", "y", SourceKind::Internal, Visibility::Private),
        ];
        let err = validate_batch(&docs).unwrap_err();
        assert!(matches!(err, LensError::DuplicateDocument(ref id) if id == "a"));
        assert!(err.is_data_integrity());
    }

    #[test]
    fn validate_batch_rejects_blank_id() {
        let docs = vec![doc("  ", "x", SourceKind::Other, Visibility::Public)];
        let err = validate_batch(&docs).unwrap_err();
        assert!(matches!(err, LensError::MissingField { ref field, .. } if field == "id"));
    }

    #[test]
    fn validate_empty_batch() {
        assert!(validate_batch(&[]).is_ok());
    }

    #[test]
    fn describe_sources_counts() {
        let docs = vec![
            doc("a", "one two three", SourceKind::Resume, Visibility::Public),
            doc("b", "four five", SourceKind::Internal, Visibility::Private),
            doc("c", "six", SourceKind::Internal, Visibility::Private),
        ];
        let summary = describe_sources(&docs);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_words, 6);
        assert!((summary.avg_words - 2.0).abs() < f64::EPSILON);
        assert_eq!(summary.by_kind[&SourceKind::Internal], 2);
        assert_eq!(summary.by_visibility[&Visibility::Public], 1);
        assert_eq!(summary.by_visibility[&Visibility::Private], 2);
    }

    #[test]
    fn describe_empty_sources() {
        let summary = describe_sources(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.avg_words.abs() < f64::EPSILON);
    }

    #[test]
    fn merge_public_only() {
        let docs = vec![
            doc("cv", "Python developer", SourceKind::Resume, Visibility::Public),
            doc("review", "secret praise", SourceKind::Internal, Visibility::Private),
            doc("blank", "   ", SourceKind::Profile, Visibility::Public),
        ];
        let merged = merge_sources_text(&docs, Some(Visibility::Public));
        assert_eq!(merged, "[cv | resume]\nPython developer");
        assert!(!merged.contains("secret"));

        let all = merge_sources_text(&docs, None);
        assert!(all.contains("[review | internal]\nsecret praise"));
    }

    #[test]
    fn parse_kind_and_visibility() {
        assert_eq!("GitHub".parse::<SourceKind>().unwrap(), SourceKind::Repo);
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
        assert!("shared".parse::<Visibility>().is_err());
    }

    #[test]
    fn document_serde_defaults() {
        let doc: SourceDocument =
            serde_json::from_str(r#"{"id":"x","text":"hello"}"#).unwrap();
        assert_eq!(doc.visibility, Visibility::Private);
        assert_eq!(doc.source_kind, SourceKind::Other);
        assert!(doc.created_at.is_none());
    }
}
