use proptest::prelude::*;

use talentlens::documents::{SourceDocument, SourceKind, Visibility};

/// Words that hit the built-in registry, mixed with filler.
const WORDS: &[&str] = &[
    "Python", "docker", "SQL", "k8s", "led", "mentored", "stakeholders", "roadmap", "debugged",
    "the", "and", "gardening", "team", "with", "aligned", "Agile", "pytorch", "\n",
];

pub fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..40).prop_map(|words| words.join(" "))
}

pub fn arb_kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::Resume),
        Just(SourceKind::Profile),
        Just(SourceKind::Repo),
        Just(SourceKind::Internal),
        Just(SourceKind::Other),
    ]
}

pub fn arb_visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![Just(Visibility::Public), Just(Visibility::Private)]
}

/// A batch with unique ids `doc-0`, `doc-1`, ...
pub fn arb_corpus(max_docs: usize) -> impl Strategy<Value = Vec<SourceDocument>> {
    prop::collection::vec((arb_text(), arb_kind(), arb_visibility()), 0..max_docs).prop_map(
        |docs| {
            docs.into_iter()
                .enumerate()
                .map(|(idx, (text, kind, visibility))| {
                    SourceDocument::new(format!("doc-{idx}"), text, kind, visibility)
                })
                .collect()
        },
    )
}
