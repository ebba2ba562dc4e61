//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod formatters;
pub mod output;

/// talentlens - Surface explicit and implicit skills from free-text sources
#[derive(Parser, Debug)]
#[command(name = "tlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Force plain output (no colors)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/tlens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skill registry file (TOML). Defaults to the built-in framework.
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective output format.
    ///
    /// Priority order:
    /// 1. `--plain` → Plain format
    /// 2. `--output-format` → Explicit format
    /// 3. `--machine` → JSON format (shorthand)
    /// 4. Default → Human format
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.plain {
            return OutputFormat::Plain;
        }
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        OutputFormat::from_args(self.machine, None)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a skill profile from source documents
    Analyze(commands::analyze::AnalyzeArgs),

    /// Write the shareable profile export (public evidence only)
    Export(commands::export::ExportArgs),

    /// Summarize the source documents without scanning them
    Sources(commands::sources::SourcesArgs),

    /// Show or validate the skill framework registry
    Framework(commands::framework::FrameworkArgs),

    /// Show effective configuration
    Config(commands::config::ConfigArgs),
}
