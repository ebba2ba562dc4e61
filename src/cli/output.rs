use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::error::{ErrorCode, LensError, Result, StructuredError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON wrapped in a status envelope
    Json,
    /// Newline-delimited JSON (one object per line)
    Jsonl,
    /// Plain text without colors or formatting
    Plain,
    /// Tab-separated values (for shell scripting)
    Tsv,
}

impl OutputFormat {
    /// Determine format from CLI args (`--machine` overrides an explicit format)
    #[must_use]
    pub fn from_args(machine: bool, format: Option<Self>) -> Self {
        if machine {
            Self::Json
        } else {
            format.unwrap_or_default()
        }
    }

    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl | Self::Tsv)
    }

    /// Formats whose errors are reported as JSON on stdout.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl)
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    #[serde(rename = "error")]
    StructuredError {
        /// Error code enum value (e.g., "REGISTRY_AMBIGUOUS_CATEGORY")
        code: ErrorCode,
        numeric_code: u16,
        message: String,
        /// Actionable suggestion for recovery
        suggestion: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        recoverable: bool,
        category: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        help_url: Option<String>,
    },
    /// Some documents failed; the rest were analysed.
    Partial { completed: usize, failed: usize },
}

fn envelope<T: Serialize>(status: RobotStatus, data: T, warnings: Vec<String>) -> RobotResponse<T> {
    RobotResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings,
    }
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    envelope(RobotStatus::Ok, data, Vec::new())
}

/// Envelope for a run that finished with per-document failures.
pub fn robot_partial<T: Serialize>(
    data: T,
    completed: usize,
    failed: usize,
    warnings: Vec<String>,
) -> RobotResponse<T> {
    envelope(RobotStatus::Partial { completed, failed }, data, warnings)
}

/// Create a robot error response from a `LensError`.
pub fn robot_error_structured(err: &LensError) -> RobotResponse<serde_json::Value> {
    envelope(RobotStatus::from(err), serde_json::Value::Null, Vec::new())
}

impl From<StructuredError> for RobotStatus {
    fn from(err: StructuredError) -> Self {
        Self::StructuredError {
            code: err.code,
            numeric_code: err.numeric_code,
            message: err.message,
            suggestion: err.suggestion,
            context: err.context,
            recoverable: err.recoverable,
            category: err.category,
            help_url: err.help_url,
        }
    }
}

impl From<&LensError> for RobotStatus {
    fn from(err: &LensError) -> Self {
        err.to_structured().into()
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| LensError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Emit a slice of items in JSONL format (one JSON object per line)
pub fn emit_jsonl<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        let json = serde_json::to_string(item)
            .map_err(|e| LensError::Serialization(format!("serialize output: {e}")))?;
        println!("{json}");
    }
    Ok(())
}

/// Emit TSV output with headers. Tabs and newlines inside cells become spaces.
pub fn emit_tsv<T, F>(headers: &[&str], items: &[T], row_fn: F)
where
    F: Fn(&T) -> Vec<String>,
{
    println!("{}", tsv_lines(headers, items, row_fn).join("\n"));
}

fn tsv_lines<T, F>(headers: &[&str], items: &[T], row_fn: F) -> Vec<String>
where
    F: Fn(&T) -> Vec<String>,
{
    let mut lines = vec![headers.join("\t")];
    lines.extend(items.iter().map(|item| {
        row_fn(item)
            .iter()
            .map(|cell| cell.replace(['\t', '\n'], " "))
            .collect::<Vec<_>>()
            .join("\t")
    }));
    lines
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
    colors: bool,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
            colors: true,
        }
    }

    /// Layout without ANSI styling, for `--plain`.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
            colors: false,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        let line = if self.colors {
            style(text).bold().to_string()
        } else {
            text.to_string()
        };
        self.lines.push(line);
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        let line = if self.colors {
            style(text).bold().to_string()
        } else {
            text.to_string()
        };
        self.lines.push(line);
        self.lines.push("-".repeat(text.chars().count().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        let key_text = if self.colors {
            style(padded).dim().to_string()
        } else {
            padded
        };
        self.lines.push(format!("{key_text} {value}"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Trait for types that can format themselves for different output modes
pub trait Formattable {
    fn format(&self, fmt: OutputFormat) -> String;
}

/// Emit a formattable value to stdout
pub fn emit<T: Formattable>(value: &T, format: OutputFormat) {
    println!("{}", value.format(format));
}
