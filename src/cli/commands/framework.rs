//! tlens framework - Show or validate the skill registry

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::error::Result;
use crate::registry::Registry;

#[derive(Args, Debug)]
pub struct FrameworkArgs {
    /// Validate this registry file instead of listing the active one
    #[arg(long, value_name = "FILE")]
    pub check: Option<PathBuf>,
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    skills: &'a [String],
}

#[derive(Serialize)]
struct FrameworkReport<'a> {
    source: String,
    fingerprint: &'a str,
    skill_count: usize,
    explicit_skills: usize,
    implicit_skills: usize,
    categories: Vec<CategoryRow<'a>>,
}

pub fn run(ctx: &AppContext, args: &FrameworkArgs) -> Result<()> {
    if let Some(path) = &args.check {
        // Any registry error propagates and is reported like every other failure.
        let registry = Registry::from_toml_path(path)?;
        return report(ctx, &registry, path.display().to_string(), true);
    }

    let source = ctx
        .registry_path
        .as_ref()
        .map_or_else(|| "builtin".to_string(), |p| p.display().to_string());
    report(ctx, &ctx.registry, source, false)
}

fn report(ctx: &AppContext, registry: &Registry, source: String, checked: bool) -> Result<()> {
    let report = FrameworkReport {
        source,
        fingerprint: registry.fingerprint(),
        skill_count: registry.skill_count(),
        explicit_skills: registry.explicit_matchers().len(),
        implicit_skills: registry.implicit_matchers().len(),
        categories: registry
            .categories()
            .iter()
            .map(|c| CategoryRow {
                category: &c.name,
                skills: &c.skills,
            })
            .collect(),
    };

    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(&report)),
        OutputFormat::Jsonl => emit_jsonl(&report.categories),
        OutputFormat::Tsv => {
            let rows: Vec<(&str, &String)> = registry
                .categories()
                .iter()
                .flat_map(|c| c.skills.iter().map(move |s| (c.name.as_str(), s)))
                .collect();
            emit_tsv(&["category", "skill"], &rows, |(category, skill)| {
                vec![(*category).to_string(), (*skill).clone()]
            });
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            if checked {
                let mark = if ctx.output_format.use_colors() {
                    "✓".green().to_string()
                } else {
                    "ok".to_string()
                };
                println!("{mark} {} is a valid registry", report.source);
                println!();
            }
            let mut layout = if ctx.output_format.use_colors() {
                HumanLayout::new()
            } else {
                HumanLayout::plain()
            };
            layout
                .title("Skill framework")
                .kv("Source", &report.source)
                .kv("Fingerprint", report.fingerprint)
                .kv(
                    "Skills",
                    &format!(
                        "{} ({} with aliases, {} with cue patterns)",
                        report.skill_count, report.explicit_skills, report.implicit_skills
                    ),
                )
                .blank();
            for category in &report.categories {
                layout.section(category.category);
                for skill in category.skills {
                    layout.bullet(skill);
                }
                layout.blank();
            }
            println!("{}", layout.build());
            Ok(())
        }
    }
}
