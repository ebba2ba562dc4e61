//! Output formatters for CLI commands
//!
//! Provides structured formatters that can render to multiple formats
//! (Human, JSON, JSONL, Plain, TSV).

mod profile_view;

pub use profile_view::ProfileView;
