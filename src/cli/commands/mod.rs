//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use std::path::PathBuf;

use clap::Args;
use tracing::{info_span, warn};
use uuid::Uuid;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::documents::load::{LoadedDocuments, TextFileOptions, load_manifest, load_text_paths};
use crate::documents::{SourceKind, Visibility};
use crate::error::{LensError, Result};
use crate::profile::{AnalysisOutcome, ProfileBuilder};

pub mod analyze;
pub mod config;
pub mod export;
pub mod framework;
pub mod sources;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze::run(ctx, args),
        Commands::Export(args) => export::run(ctx, args),
        Commands::Sources(args) => sources::run(ctx, args),
        Commands::Framework(args) => framework::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Where documents come from. Shared by every command that reads a corpus.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Text files (.txt, .md) or directories of them
    pub paths: Vec<PathBuf>,

    /// JSON or JSON Lines manifest of typed documents
    #[arg(long)]
    pub manifest: Vec<PathBuf>,

    /// Source kind applied to positional files: resume, profile, repo, internal, other
    #[arg(long, default_value = "other")]
    pub kind: SourceKind,

    /// Visibility applied to positional files: public, private
    #[arg(long, default_value = "private")]
    pub visibility: Visibility,
}

/// Read every manifest and text path. Manifests come first, in flag order.
pub fn load_inputs(input: &InputArgs) -> Result<LoadedDocuments> {
    if input.paths.is_empty() && input.manifest.is_empty() {
        return Err(LensError::ValidationFailed(
            "no input documents: pass text paths or --manifest FILE".to_string(),
        ));
    }

    let mut loaded = LoadedDocuments::default();
    for manifest in &input.manifest {
        loaded.extend(load_manifest(manifest)?);
    }
    loaded.extend(load_text_paths(
        &input.paths,
        TextFileOptions {
            kind: input.kind,
            visibility: input.visibility,
        },
    ));
    Ok(loaded)
}

/// Load the inputs and build a profile. Load failures are reported next to
/// scan failures; neither stops the run.
pub fn analyze_inputs(
    ctx: &AppContext,
    input: &InputArgs,
    subject: &str,
    min_confidence: Option<f64>,
) -> Result<AnalysisOutcome> {
    let run_id = Uuid::new_v4();
    let span = info_span!("analysis", %run_id, subject = %subject);
    let _guard = span.enter();

    let loaded = load_inputs(input)?;
    if loaded.documents.is_empty() {
        warn!(failures = loaded.failures.len(), "no readable documents");
    }

    let mut builder = ProfileBuilder::from_config(&ctx.registry, &ctx.config);
    if let Some(floor) = min_confidence {
        if !(0.0..=1.0).contains(&floor) {
            return Err(LensError::ValidationFailed(format!(
                "--min-confidence must be within [0, 1], got {floor}"
            )));
        }
        builder = builder.with_min_confidence(floor);
    }

    let mut outcome = builder.build_profile(subject, &loaded.documents)?;
    let mut failures = loaded.failures;
    failures.append(&mut outcome.failures);
    outcome.failures = failures;
    Ok(outcome)
}
