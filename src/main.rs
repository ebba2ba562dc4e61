//! tlens - talentlens CLI
//!
//! Surface explicit and implicit skills from free-text documents.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use talentlens::Result;
use talentlens::app::AppContext;
use talentlens::cli::Cli;
use talentlens::cli::output::robot_error_structured;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.output_format().is_json() {
                // Machine mode: structured error to stdout
                let response = robot_error_structured(&e);
                println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
                eprintln!("  hint: {}", e.to_structured().suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    talentlens::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,talentlens=info",
        1 => "info,talentlens=debug",
        2 => "debug,talentlens=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.output_format().is_machine_readable() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
