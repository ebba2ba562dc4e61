//! tlens export - Write the shareable profile document

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::commands::{InputArgs, analyze_inputs};
use crate::cli::output::{emit_json, robot_ok};
use crate::error::{LensError, Result};
use crate::profile::export::{ExportOptions, to_json, write_export};

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Identifier of the person or entity being profiled
    #[arg(long, default_value = "subject")]
    pub subject: String,

    /// Drop skills scoring below this confidence (overrides config)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Decimal places for confidence values (overrides config)
    #[arg(long)]
    pub precision: Option<u32>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn run(ctx: &AppContext, args: &ExportArgs) -> Result<()> {
    let precision = args.precision.unwrap_or(ctx.config.export.precision);
    if precision > 12 {
        return Err(LensError::ValidationFailed(format!(
            "--precision must be at most 12, got {precision}"
        )));
    }
    let options = ExportOptions {
        precision,
        pretty: ctx.config.export.pretty && !args.compact,
    };

    let outcome = analyze_inputs(ctx, &args.input, &args.subject, args.min_confidence)?;
    let document = to_json(&outcome.profile, options)?;

    let Some(path) = &args.out else {
        println!("{document}");
        return Ok(());
    };

    write_export(path, &document)?;
    info!(path = %path.display(), skills = outcome.profile.skills.len(), "export written");

    if ctx.robot_mode {
        return emit_json(&robot_ok(serde_json::json!({
            "path": path.display().to_string(),
            "skills": outcome.profile.skills.len(),
            "failures": outcome.failures,
        })));
    }

    println!(
        "{} Wrote {} skills to {}",
        "✓".green(),
        outcome.profile.skills.len(),
        path.display().to_string().cyan()
    );
    for failure in &outcome.failures {
        println!("  {} {}: {}", "skipped".yellow(), failure.document_id, failure.reason);
    }
    Ok(())
}
