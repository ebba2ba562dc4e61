//! tlens sources - Describe the input corpus without scanning it

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::{InputArgs, load_inputs};
use crate::cli::output::{HumanLayout, OutputFormat, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::documents::{DocumentFailure, SourceSummary, Visibility, describe_sources, merge_sources_text};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SourcesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the public-only merged corpus
    #[arg(long)]
    pub preview: bool,
}

#[derive(Serialize)]
struct SourcesReport<'a> {
    summary: SourceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_preview: Option<String>,
    failures: &'a [DocumentFailure],
}

pub fn run(ctx: &AppContext, args: &SourcesArgs) -> Result<()> {
    let loaded = load_inputs(&args.input)?;
    let summary = describe_sources(&loaded.documents);
    let preview = args
        .preview
        .then(|| merge_sources_text(&loaded.documents, Some(Visibility::Public)));

    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(SourcesReport {
            summary,
            public_preview: preview,
            failures: &loaded.failures,
        })),
        OutputFormat::Jsonl => emit_jsonl(&[SourcesReport {
            summary,
            public_preview: preview,
            failures: &loaded.failures,
        }]),
        OutputFormat::Tsv => {
            emit_tsv(
                &["id", "kind", "visibility", "words"],
                &loaded.documents,
                |doc| {
                    vec![
                        doc.id.clone(),
                        doc.source_kind.to_string(),
                        doc.visibility.to_string(),
                        doc.word_count().to_string(),
                    ]
                },
            );
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let mut layout = if ctx.output_format.use_colors() {
                HumanLayout::new()
            } else {
                HumanLayout::plain()
            };
            layout
                .title("Sources")
                .kv("Documents", &summary.count.to_string())
                .kv("Total words", &summary.total_words.to_string())
                .kv("Average words", &format!("{:.1}", summary.avg_words))
                .blank()
                .section("By kind");
            for (kind, count) in &summary.by_kind {
                layout.bullet(&format!("{kind}: {count}"));
            }
            layout.blank().section("By visibility");
            for (visibility, count) in &summary.by_visibility {
                layout.bullet(&format!("{visibility}: {count}"));
            }
            if !loaded.failures.is_empty() {
                layout.blank().section("Unreadable");
                for failure in &loaded.failures {
                    layout.bullet(&format!("{}: {}", failure.document_id, failure.reason));
                }
            }
            println!("{}", layout.build());

            if let Some(preview) = preview {
                println!();
                if preview.is_empty() {
                    println!("{}", "No public documents to preview".dimmed());
                } else {
                    println!("{preview}");
                }
            }
            Ok(())
        }
    }
}
