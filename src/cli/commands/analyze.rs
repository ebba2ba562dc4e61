//! tlens analyze - Build a skill profile from source documents

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::{InputArgs, analyze_inputs};
use crate::cli::formatters::ProfileView;
use crate::cli::output::emit;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Identifier of the person or entity being profiled
    #[arg(long, default_value = "subject")]
    pub subject: String,

    /// Drop skills scoring below this confidence (overrides config)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Maximum number of skills to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &AnalyzeArgs) -> Result<()> {
    let outcome = analyze_inputs(ctx, &args.input, &args.subject, args.min_confidence)?;
    emit(
        &ProfileView::new(&outcome).with_limit(args.limit),
        ctx.output_format,
    );
    Ok(())
}
