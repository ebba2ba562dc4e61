//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Registry errors (taxonomy and vocabulary configuration)
//! - 2xx: Document errors (data integrity and per-document failures)
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `RegistryUnmappedSkill` -> E101).
/// Codes are grouped by category for easy identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Registry errors (1xx)
    // ========================================
    /// E101: A vocabulary or pattern skill has no framework category
    RegistryUnmappedSkill,
    /// E102: A skill is listed under more than one framework category
    RegistryAmbiguousCategory,
    /// E103: An implicit cue pattern or alias failed to compile
    RegistryInvalidPattern,
    /// E104: Registry file is structurally invalid
    RegistryInvalid,
    /// E105: A detected skill could not be mapped to a category
    SkillUncategorized,

    // ========================================
    // Document errors (2xx)
    // ========================================
    /// E201: Two documents in one batch share an id
    DocumentDuplicateId,
    /// E202: A required document field is missing or empty
    DocumentMissingField,
    /// E203: A document was rejected by the scanner
    DocumentRejected,
    /// E204: A document could not be loaded from disk
    DocumentLoadFailed,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file not found
    ConfigNotFound,
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E602: Failed to write an output artifact
    StorageWriteError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Validation rules failed
    ValidationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E905: Generic not found (catch-all)
    NotFound,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `RegistryUnmappedSkill` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            // Registry errors (1xx)
            Self::RegistryUnmappedSkill => 101,
            Self::RegistryAmbiguousCategory => 102,
            Self::RegistryInvalidPattern => 103,
            Self::RegistryInvalid => 104,
            Self::SkillUncategorized => 105,

            // Document errors (2xx)
            Self::DocumentDuplicateId => 201,
            Self::DocumentMissingField => 202,
            Self::DocumentRejected => 203,
            Self::DocumentLoadFailed => 204,

            // Config errors (3xx)
            Self::ConfigNotFound => 301,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            // Storage errors (6xx)
            Self::StorageWriteError => 602,
            Self::SerializationError => 605,

            // Validation errors (8xx)
            Self::ValidationFailed => 801,

            // Internal errors (9xx)
            Self::InternalError => 901,
            Self::NotFound => 905,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            // Registry errors
            Self::RegistryUnmappedSkill => "Add the skill to exactly one `[[categories]]` entry in the registry file",
            Self::RegistryAmbiguousCategory => "Remove the skill from all but one category. Run `tlens framework --check <file>` to re-validate",
            Self::RegistryInvalidPattern => "Fix the regular expression syntax. Patterns use Rust `regex` syntax and are matched case-insensitively",
            Self::RegistryInvalid => "Check the registry TOML structure: `[[categories]]`, `[explicit]` and `[implicit]` tables",
            Self::SkillUncategorized => "The registry is inconsistent. Run `tlens framework --check <file>` on the registry in use",

            // Document errors
            Self::DocumentDuplicateId => "Give every document in the batch a unique `id`",
            Self::DocumentMissingField => "Populate the missing document field before running the analysis",
            Self::DocumentRejected => "Inspect the document content. Binary or oversized documents are skipped",
            Self::DocumentLoadFailed => "Check that the file exists, is readable and is UTF-8 text",

            // Config errors
            Self::ConfigNotFound => "Create ~/.config/tlens/config.toml or specify --config <path>",
            Self::ConfigInvalid => "Run `tlens config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the required config value in the config file or via a TLENS_* variable",

            // Storage errors
            Self::StorageWriteError => "Check disk space and write permissions on the output path",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            // Validation errors
            Self::ValidationFailed => "Review the validation errors and fix each issue",

            // Internal errors
            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::NotFound => "The requested resource was not found. Check the path or identifier",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::RegistryUnmappedSkill
            | Self::RegistryAmbiguousCategory
            | Self::RegistryInvalidPattern
            | Self::RegistryInvalid
            | Self::DocumentDuplicateId
            | Self::DocumentMissingField
            | Self::DocumentRejected
            | Self::DocumentLoadFailed
            | Self::ConfigNotFound
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::StorageWriteError
            | Self::ValidationFailed
            | Self::NotFound
            | Self::IoError => true,

            // A built registry that still fails to categorize is a bug
            Self::SkillUncategorized | Self::SerializationError | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "registry",
            2 => "document",
            3 => "config",
            6 => "storage",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Get a URL to documentation for this error (if available).
    #[must_use]
    pub fn help_url(&self) -> Option<String> {
        Some(format!(
            "https://docs.talentlens.dev/errors/{}",
            self.code_string()
        ))
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::RegistryUnmappedSkill,
            Self::RegistryAmbiguousCategory,
            Self::RegistryInvalidPattern,
            Self::RegistryInvalid,
            Self::SkillUncategorized,
            Self::DocumentDuplicateId,
            Self::DocumentMissingField,
            Self::DocumentRejected,
            Self::DocumentLoadFailed,
            Self::ConfigNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::StorageWriteError,
            Self::SerializationError,
            Self::ValidationFailed,
            Self::InternalError,
            Self::NotFound,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
