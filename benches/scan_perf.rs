//! Criterion benchmarks for scanning and profile building.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use talentlens::documents::{SourceDocument, SourceKind, Visibility};
use talentlens::profile::{ProfileBuilder, ProfileOptions};
use talentlens::registry::Registry;
use talentlens::scan::{ScanOptions, Scanner};
use talentlens::scoring::ConfidenceScorer;
use talentlens::test_utils::fixtures;

fn corpus(documents: usize) -> Vec<SourceDocument> {
    let base = fixtures::mixed_corpus();
    (0..documents)
        .map(|i| {
            let template = &base[i % base.len()];
            SourceDocument::new(
                format!("doc-{i}"),
                template.text.repeat(4),
                template.source_kind,
                template.visibility,
            )
        })
        .collect()
}

// =============================================================================
// Scanner
// =============================================================================

fn scan_benchmarks(c: &mut Criterion) {
    let registry = Registry::builtin().expect("builtin registry");
    let scanner = Scanner::new(&registry, ScanOptions::default());
    let mut group = c.benchmark_group("scan_document");

    for words in [50, 500, 5000] {
        let text = "Python and Docker, led the team, aligned stakeholders on a roadmap. "
            .repeat(words / 12 + 1);
        let doc = SourceDocument::new("bench", text, SourceKind::Resume, Visibility::Public);

        group.throughput(Throughput::Bytes(doc.text.len() as u64));
        group.bench_with_input(BenchmarkId::new("words", words), &doc, |b, doc| {
            b.iter(|| scanner.scan(black_box(doc)));
        });
    }
    group.finish();
}

// =============================================================================
// Profile build
// =============================================================================

fn profile_benchmarks(c: &mut Criterion) {
    let registry = Registry::builtin().expect("builtin registry");
    let mut group = c.benchmark_group("build_profile");

    for (label, parallel) in [("sequential", false), ("parallel", true)] {
        let builder = ProfileBuilder::new(
            &registry,
            ConfidenceScorer::default(),
            ProfileOptions {
                parallel,
                parallel_threshold: 1,
                ..ProfileOptions::default()
            },
        );
        for size in [10, 100] {
            let docs = corpus(size);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new(label, size), &docs, |b, docs| {
                b.iter(|| builder.build_profile_at("bench", black_box(docs), fixtures::fixed_timestamp()));
            });
        }
    }
    group.finish();
}

fn registry_benchmarks(c: &mut Criterion) {
    c.bench_function("compile_builtin_registry", |b| {
        b.iter(|| Registry::builtin().expect("builtin registry"));
    });
}

criterion_group!(benches, scan_benchmarks, profile_benchmarks, registry_benchmarks);
criterion_main!(benches);
