//! Document scanner.
//!
//! Applies a compiled [`Registry`] to one document and reports every match
//! as a [`SkillHit`]:
//! - explicit pass: alias tokens, case-insensitive, on word boundaries
//! - implicit pass: cue patterns anywhere in the text
//!
//! Scanning is a pure function of the document text and registry. Repeated
//! mentions are all kept; the aggregator decides what to retain.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::documents::{SourceDocument, SourceKind, Visibility};
use crate::error::{LensError, Result};
use crate::registry::Registry;

/// How a skill was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Explicit,
    Implicit,
}

impl DetectionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Implicit => "implicit",
        }
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One match inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillHit {
    pub skill_name: String,
    pub detection_kind: DetectionKind,
    pub matched_text: String,
    pub snippet: String,
    /// Byte offset of the match in the document text.
    pub position: usize,
    pub document_id: String,
    pub source_kind: SourceKind,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Characters of context kept on each side of a match.
    pub snippet_window: usize,
    /// Documents larger than this are rejected by [`Scanner::try_scan`].
    pub max_document_bytes: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            snippet_window: 90,
            max_document_bytes: 5 * 1024 * 1024,
        }
    }
}

pub struct Scanner<'r> {
    registry: &'r Registry,
    options: ScanOptions,
}

impl<'r> Scanner<'r> {
    #[must_use]
    pub const fn new(registry: &'r Registry, options: ScanOptions) -> Self {
        Self { registry, options }
    }

    /// Scan one document. Never fails; no matches means an empty result.
    #[must_use]
    pub fn scan(&self, document: &SourceDocument) -> Vec<SkillHit> {
        if document.is_blank() {
            return Vec::new();
        }

        let text = document.text.as_str();
        let mut hits = Vec::new();

        for matcher in self.registry.explicit_matchers() {
            for (start, end) in matcher.find_iter(text) {
                hits.push(self.hit(document, &matcher.skill, DetectionKind::Explicit, start, end));
            }
        }

        for matcher in self.registry.implicit_matchers() {
            for (start, end) in matcher.find_iter(text) {
                hits.push(self.hit(document, &matcher.skill, DetectionKind::Implicit, start, end));
            }
        }

        hits.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.detection_kind.cmp(&b.detection_kind))
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });

        debug!(document = %document.id, hits = hits.len(), "scanned document");
        hits
    }

    /// Scan after checking the document is something we can read as text.
    pub fn try_scan(&self, document: &SourceDocument) -> Result<Vec<SkillHit>> {
        if document.text.len() > self.options.max_document_bytes {
            return Err(LensError::DocumentRejected {
                document_id: document.id.clone(),
                reason: format!(
                    "{} bytes exceeds the {} byte limit",
                    document.text.len(),
                    self.options.max_document_bytes
                ),
            });
        }
        if document.text.contains('\0') {
            return Err(LensError::DocumentRejected {
                document_id: document.id.clone(),
                reason: "text contains NUL bytes (binary content?)".to_string(),
            });
        }
        Ok(self.scan(document))
    }

    /// Scan a batch, one result per document in input order.
    ///
    /// With `parallel` set the documents are spread over the rayon pool;
    /// the indexed collect keeps results in input order either way.
    #[must_use]
    pub fn scan_batch(&self, documents: &[SourceDocument], parallel: bool) -> Vec<Result<Vec<SkillHit>>> {
        if parallel {
            documents.par_iter().map(|doc| self.try_scan(doc)).collect()
        } else {
            documents.iter().map(|doc| self.try_scan(doc)).collect()
        }
    }

    fn hit(
        &self,
        document: &SourceDocument,
        skill: &str,
        detection_kind: DetectionKind,
        start: usize,
        end: usize,
    ) -> SkillHit {
        let text = document.text.as_str();
        SkillHit {
            skill_name: skill.to_string(),
            detection_kind,
            matched_text: text[start..end].to_string(),
            snippet: snippet(text, start, end, self.options.snippet_window),
            position: start,
            document_id: document.id.clone(),
            source_kind: document.source_kind,
            visibility: document.visibility,
        }
    }
}

/// Text around `start..end`, `window` characters each side, on one line.
#[must_use]
pub fn snippet(text: &str, start: usize, end: usize, window: usize) -> String {
    let left = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(start, |(idx, _)| idx);
    let right = text[end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(idx, _)| end + idx);

    text[left..right]
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}
