use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::documents::{SourceDocument, SourceKind, Visibility};

pub const RESUME_TEXT: &str = "Python, Docker, led a cross-functional team";
pub const REVIEW_TEXT: &str = "excellent stakeholder management";

/// One public resume and one private performance review.
pub fn example_corpus() -> Vec<SourceDocument> {
    vec![
        SourceDocument::new("resume", RESUME_TEXT, SourceKind::Resume, Visibility::Public),
        SourceDocument::new("review", REVIEW_TEXT, SourceKind::Internal, Visibility::Private),
    ]
}

/// A larger corpus of every source kind and both visibilities.
pub fn mixed_corpus() -> Vec<SourceDocument> {
    let docs = [
        (
            "resume",
            "Senior engineer. Python, SQL and AWS. Led the platform team and mentored two juniors.",
            SourceKind::Resume,
            Visibility::Public,
        ),
        (
            "linkedin",
            "Machine learning with PyTorch and Pandas. Presented at PyCon. Kubernetes (k8s) in production.",
            SourceKind::Profile,
            Visibility::Public,
        ),
        (
            "repo-etl",
            "ETL jobs in Python with numpy; CI/CD via GitHub Actions; Docker images for every service.",
            SourceKind::Repo,
            Visibility::Public,
        ),
        (
            "repo-web",
            "TypeScript frontend, JavaScript tooling, git hooks. Prototyped a new search experience.",
            SourceKind::Repo,
            Visibility::Public,
        ),
        (
            "review-2024",
            "Managed the migration and aligned the data team on a roadmap. Strong stakeholder trust.",
            SourceKind::Internal,
            Visibility::Private,
        ),
        (
            "review-2025",
            "Ran retrospectives, debugged production incidents, found the root cause of outages.",
            SourceKind::Internal,
            Visibility::Private,
        ),
        (
            "notes",
            "Facilitated an agile workshop; scrum and kanban boards; compliance audit prep.",
            SourceKind::Other,
            Visibility::Private,
        ),
        (
            "blank",
            "   ",
            SourceKind::Other,
            Visibility::Public,
        ),
        (
            "cover-letter",
            "I care about communication, innovation and data science.",
            SourceKind::Other,
            Visibility::Public,
        ),
    ];
    docs.into_iter()
        .map(|(id, text, kind, visibility)| SourceDocument::new(id, text, kind, visibility))
        .collect()
}

/// Timestamp used wherever output must be reproducible.
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Isolated directory for document and manifest files.
pub struct CorpusFixture {
    pub temp_dir: TempDir,
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a text document, creating parent directories.
    pub fn write_text(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write a JSON Lines manifest of `(id, text, source_kind, visibility)` rows.
    pub fn write_manifest(&self, rows: &[(&str, &str, &str, &str)]) -> PathBuf {
        let body = rows
            .iter()
            .map(|(id, text, kind, visibility)| {
                serde_json::json!({
                    "id": id,
                    "text": text,
                    "source_kind": kind,
                    "visibility": visibility,
                })
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.write_text("manifest.jsonl", &body)
    }

    /// Write a registry file.
    pub fn write_registry(&self, toml: &str) -> PathBuf {
        self.write_text("registry.toml", toml)
    }
}

impl Drop for CorpusFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.path());
    }
}
