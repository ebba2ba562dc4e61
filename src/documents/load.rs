//! Turning files on disk into [`SourceDocument`]s for the CLI.
//!
//! Two input shapes are supported:
//! - a manifest (JSON array or JSON Lines) of fully described documents
//! - plain `.txt`/`.md` files or directories, tagged with one kind and visibility
//!
//! A file that cannot be read becomes a [`DocumentFailure`] so the rest of
//! the corpus still gets analysed. A manifest entry without an `id` or `text`
//! is a data-integrity error and aborts the load.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{DocumentFailure, SourceDocument, SourceKind, Visibility};
use crate::error::{LensError, Result};

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Documents read from disk plus the inputs that had to be skipped.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<SourceDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl LoadedDocuments {
    pub fn extend(&mut self, other: Self) {
        self.documents.extend(other.documents);
        self.failures.extend(other.failures);
    }
}

/// Tags applied to documents loaded from plain text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileOptions {
    pub kind: SourceKind,
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: Option<String>,
    text: Option<String>,
    #[serde(default)]
    source_kind: SourceKind,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ManifestEntry {
    fn into_document(self, position: &str) -> Result<SourceDocument> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| LensError::MissingField {
                document: position.to_string(),
                field: "id".to_string(),
            })?;
        let text = self.text.ok_or_else(|| LensError::MissingField {
            document: id.clone(),
            field: "text".to_string(),
        })?;

        Ok(SourceDocument {
            id,
            text,
            source_kind: self.source_kind,
            visibility: self.visibility,
            created_at: self.created_at,
        })
    }
}

/// Load a manifest file: a JSON array of documents, or one JSON document per line.
pub fn load_manifest(path: &Path) -> Result<LoadedDocuments> {
    let raw = std::fs::read_to_string(path).map_err(|err| LensError::DocumentLoad {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    parse_manifest(&raw, &path.display().to_string())
}

/// Parse manifest content. `origin` names the source in failure ids.
pub fn parse_manifest(raw: &str, origin: &str) -> Result<LoadedDocuments> {
    let mut loaded = LoadedDocuments::default();

    if raw.trim_start().starts_with('[') {
        let entries: Vec<ManifestEntry> = serde_json::from_str(raw)?;
        for (idx, entry) in entries.into_iter().enumerate() {
            loaded
                .documents
                .push(entry.into_document(&format!("{origin}[{idx}]"))?);
        }
        return Ok(loaded);
    }

    for (line_no, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let position = format!("{origin}:{}", line_no + 1);
        match serde_json::from_str::<ManifestEntry>(line) {
            Ok(entry) => loaded.documents.push(entry.into_document(&position)?),
            Err(err) => {
                warn!(position = %position, error = %err, "skipping malformed manifest line");
                let err = LensError::DocumentLoad {
                    path: position.clone(),
                    reason: err.to_string(),
                };
                loaded.failures.push(DocumentFailure::from_error(position, &err));
            }
        }
    }

    Ok(loaded)
}

/// Load text files and directories of text files.
///
/// Directories are walked recursively in file-name order so document order,
/// and with it snippet order, is stable across runs.
#[must_use]
pub fn load_text_paths(paths: &[PathBuf], options: TextFileOptions) -> LoadedDocuments {
    let mut loaded = LoadedDocuments::default();

    for path in paths {
        if path.is_dir() {
            let walker = WalkDir::new(path).sort_by_file_name().into_iter();
            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && has_text_extension(entry.path()) => {
                        load_text_file(entry.path(), options, &mut loaded);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        let id = err
                            .path()
                            .map_or_else(|| path.display().to_string(), |p| p.display().to_string());
                        let err = LensError::DocumentLoad {
                            path: id.clone(),
                            reason: err.to_string(),
                        };
                        loaded.failures.push(DocumentFailure::from_error(id, &err));
                    }
                }
            }
        } else {
            load_text_file(path, options, &mut loaded);
        }
    }

    loaded
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn load_text_file(path: &Path, options: TextFileOptions, loaded: &mut LoadedDocuments) {
    let id = path.display().to_string();
    let result = std::fs::read(path)
        .map_err(|err| err.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|_| "file is not valid UTF-8".to_string()));

    match result {
        Ok(text) => {
            debug!(document = %id, bytes = text.len(), "loaded text document");
            loaded.documents.push(SourceDocument::new(
                id,
                text.trim(),
                options.kind,
                options.visibility,
            ));
        }
        Err(reason) => {
            warn!(document = %id, reason = %reason, "skipping unreadable document");
            let err = LensError::DocumentLoad {
                path: id.clone(),
                reason,
            };
            loaded.failures.push(DocumentFailure::from_error(id, &err));
        }
    }
}
