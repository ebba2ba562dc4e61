//! Error handling for talentlens.
//!
//! This module provides:
//! - [`LensError`]: The main error enum for all engine and CLI operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::{suggest_for_error, suggest_similar_skills};

/// Main error type for talentlens operations.
#[derive(Error, Debug)]
pub enum LensError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Skill '{skill}' is not assigned to any framework category")]
    UnmappedSkill { skill: String, similar: Vec<String> },

    #[error("Skill '{skill}' is assigned to multiple categories: {}", .categories.join(", "))]
    AmbiguousCategory {
        skill: String,
        categories: Vec<String>,
    },

    #[error("Invalid pattern for skill '{skill}': {pattern}: {reason}")]
    InvalidPattern {
        skill: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("Detected skill '{0}' has no framework category")]
    UncategorizedSkill(String),

    #[error("Duplicate document id in batch: {0}")]
    DuplicateDocument(String),

    #[error("Document {document} is missing required field '{field}'")]
    MissingField { document: String, field: String },

    #[error("Document {document_id} rejected: {reason}")]
    DocumentRejected { document_id: String, reason: String },

    #[error("Failed to load document {path}: {reason}")]
    DocumentLoad { path: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl LensError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::UnmappedSkill { .. } => ErrorCode::RegistryUnmappedSkill,
            Self::AmbiguousCategory { .. } => ErrorCode::RegistryAmbiguousCategory,
            Self::InvalidPattern { .. } => ErrorCode::RegistryInvalidPattern,
            Self::InvalidRegistry(_) => ErrorCode::RegistryInvalid,
            Self::UncategorizedSkill(_) => ErrorCode::SkillUncategorized,
            Self::DuplicateDocument(_) => ErrorCode::DocumentDuplicateId,
            Self::MissingField { .. } => ErrorCode::DocumentMissingField,
            Self::DocumentRejected { .. } => ErrorCode::DocumentRejected,
            Self::DocumentLoad { .. } => ErrorCode::DocumentLoadFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }

    /// Configuration errors abort before any analysis run starts.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnmappedSkill { .. }
                | Self::AmbiguousCategory { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidRegistry(_)
                | Self::UncategorizedSkill(_)
                | Self::Config(_)
                | Self::MissingConfig(_)
        )
    }

    /// Data-integrity errors abort the current run and surface to the caller.
    #[must_use]
    pub const fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::DuplicateDocument(_) | Self::MissingField { .. }
        )
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::UnmappedSkill { skill, similar } => {
                Some(serde_json::json!({ "skill": skill, "similar": similar }))
            }
            Self::UncategorizedSkill(skill) => Some(serde_json::json!({ "skill": skill })),
            Self::AmbiguousCategory { skill, categories } => {
                Some(serde_json::json!({ "skill": skill, "categories": categories }))
            }
            Self::InvalidPattern {
                skill,
                pattern,
                reason,
            } => Some(serde_json::json!({
                "skill": skill,
                "pattern": pattern,
                "reason": reason,
            })),
            Self::DuplicateDocument(id) => Some(serde_json::json!({ "document_id": id })),
            Self::MissingField { document, field } => {
                Some(serde_json::json!({ "document_id": document, "field": field }))
            }
            Self::DocumentRejected {
                document_id,
                reason,
            } => Some(serde_json::json!({ "document_id": document_id, "reason": reason })),
            Self::DocumentLoad { path, reason } => {
                Some(serde_json::json!({ "path": path, "reason": reason }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_lens_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// This type is designed for machine output where callers need
/// to parse errors and take appropriate action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "DOCUMENT_DUPLICATE_ID")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 201)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// URL to documentation about this error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Error category (e.g., "registry", "document")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            help_url: code.help_url(),
            category: code.category().to_string(),
            code,
            message,
        }
    }

    /// Create a structured error from a [`LensError`].
    #[must_use]
    pub fn from_lens_error(err: &LensError) -> Self {
        let code = err.code();
        let context = err.context();
        let message = err.to_string();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message,
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            help_url: code.help_url(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        // Regenerate suggestion with new context
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }

    /// Set a custom suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<LensError> for StructuredError {
    fn from(err: LensError) -> Self {
        Self::from_lens_error(&err)
    }
}

impl From<&LensError> for StructuredError {
    fn from(err: &LensError) -> Self {
        Self::from_lens_error(err)
    }
}

/// Result type alias using [`LensError`].
pub type Result<T> = std::result::Result<T, LensError>;
