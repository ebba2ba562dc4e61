//! Context-aware error suggestions.
//!
//! This module provides dynamic suggestion generation based on error context,
//! complementing the static suggestions in the `codes` module.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
///
/// Falls back to the static suggestion of the code when the context does
/// not carry the fields a tailored hint needs.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::RegistryUnmappedSkill => suggest_unmapped_skill(context),
        ErrorCode::RegistryAmbiguousCategory => suggest_ambiguous_category(context),
        ErrorCode::RegistryInvalidPattern => suggest_invalid_pattern(context),
        ErrorCode::DocumentDuplicateId => suggest_duplicate_document(context),
        ErrorCode::DocumentMissingField => suggest_missing_field(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn str_field<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_unmapped_skill(context: Option<&Value>) -> String {
    let Some(skill) = str_field(context, "skill") else {
        return ErrorCode::RegistryUnmappedSkill.suggestion().to_string();
    };

    let similar: Vec<&str> = context
        .and_then(|c| c.get("similar"))
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if similar.is_empty() {
        format!("Add '{skill}' to exactly one `[[categories]]` entry in the registry file")
    } else {
        format!(
            "Add '{skill}' to exactly one `[[categories]]` entry, or fix the name if you meant: {}",
            similar.join(", ")
        )
    }
}

fn suggest_ambiguous_category(context: Option<&Value>) -> String {
    let skill = str_field(context, "skill");
    let categories: Vec<&str> = context
        .and_then(|c| c.get("categories"))
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    match skill {
        Some(skill) if !categories.is_empty() => format!(
            "'{skill}' appears in {}. Keep it in one category and remove it from the others",
            categories.join(" and ")
        ),
        _ => ErrorCode::RegistryAmbiguousCategory.suggestion().to_string(),
    }
}

fn suggest_invalid_pattern(context: Option<&Value>) -> String {
    match (str_field(context, "skill"), str_field(context, "pattern")) {
        (Some(skill), Some(pattern)) => format!(
            "Pattern `{pattern}` for '{skill}' does not compile. Patterns use Rust `regex` syntax (no look-around)"
        ),
        _ => ErrorCode::RegistryInvalidPattern.suggestion().to_string(),
    }
}

fn suggest_duplicate_document(context: Option<&Value>) -> String {
    match str_field(context, "document_id") {
        Some(id) => format!(
            "Document id '{id}' appears more than once in the batch. Rename one of the documents"
        ),
        None => ErrorCode::DocumentDuplicateId.suggestion().to_string(),
    }
}

fn suggest_missing_field(context: Option<&Value>) -> String {
    match (str_field(context, "document_id"), str_field(context, "field")) {
        (Some(document), Some(field)) => {
            format!("Document '{document}' needs a non-empty `{field}` before analysis")
        }
        _ => ErrorCode::DocumentMissingField.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    match str_field(context, "config_key") {
        Some(key) => format!(
            "Required config '{key}' is missing. Set it in the config file or export TLENS_{}",
            key.replace('.', "_").to_uppercase()
        ),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}

/// Get suggestions for similar skill names based on a misspelled name.
///
/// Used when a vocabulary skill is missing from the framework table, which
/// is most often a typo in one of the two tables.
pub fn suggest_similar_skills(query: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<_> = available
        .iter()
        .map(|s| (s, similarity_score(&query_lower, &s.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(s, _)| (*s).to_string())
        .collect()
}

/// Simple similarity score between two strings (Jaccard on character trigrams).
#[allow(clippy::cast_precision_loss)]
fn similarity_score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_trigrams: std::collections::HashSet<_> = trigrams(a).collect();
    let b_trigrams: std::collections::HashSet<_> = trigrams(b).collect();

    if a_trigrams.is_empty() || b_trigrams.is_empty() {
        // Short names like "qa" or "c#" have no trigrams
        if a.starts_with(b) || b.starts_with(a) {
            return 0.8;
        }
        if a.contains(b) || b.contains(a) {
            return 0.5;
        }
        return 0.0;
    }

    let intersection = a_trigrams.intersection(&b_trigrams).count();
    let union = a_trigrams.union(&b_trigrams).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Generate character trigrams from a string.
fn trigrams(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len().saturating_sub(2)).filter_map(move |i| s.get(i..i + 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggest_unmapped_skill_with_similar() {
        let context = json!({ "skill": "Kubernetis", "similar": ["Kubernetes"] });
        let suggestion = suggest_for_error(ErrorCode::RegistryUnmappedSkill, Some(&context));
        assert!(suggestion.contains("Kubernetis"));
        assert!(suggestion.contains("Kubernetes"));
    }

    #[test]
    fn test_suggest_unmapped_skill_without_similar() {
        let context = json!({ "skill": "Rust", "similar": [] });
        let suggestion = suggest_for_error(ErrorCode::RegistryUnmappedSkill, Some(&context));
        assert!(suggestion.contains("'Rust'"));
        assert!(!suggestion.contains("meant"));
    }

    #[test]
    fn test_suggest_ambiguous_category() {
        let context = json!({ "skill": "Python", "categories": ["Data & AI", "Technical Foundation"] });
        let suggestion = suggest_for_error(ErrorCode::RegistryAmbiguousCategory, Some(&context));
        assert!(suggestion.contains("Data & AI and Technical Foundation"));
    }

    #[test]
    fn test_suggest_duplicate_document() {
        let context = json!({ "document_id": "resume.txt" });
        let suggestion = suggest_for_error(ErrorCode::DocumentDuplicateId, Some(&context));
        assert!(suggestion.contains("resume.txt"));
    }

    #[test]
    fn test_config_missing_with_key() {
        let context = json!({ "config_key": "registry.path" });
        let suggestion = suggest_for_error(ErrorCode::ConfigMissingRequired, Some(&context));
        assert!(suggestion.contains("TLENS_REGISTRY_PATH"));
    }

    #[test]
    fn test_fallback_to_static_suggestion() {
        let suggestion = suggest_for_error(ErrorCode::StorageWriteError, None);
        assert_eq!(suggestion, ErrorCode::StorageWriteError.suggestion());
    }

    #[test]
    fn test_suggest_similar_skills() {
        let available = vec!["Kubernetes", "Kanban", "Python", "TensorFlow"];
        let suggestions = suggest_similar_skills("kubernets", &available, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("Kubernetes"));
    }

    #[test]
    fn test_similarity_score() {
        assert!(similarity_score("machine learning", "machine-learning") > 0.3);
        assert!(similarity_score("abc", "xyz") < 0.1);
        assert!(similarity_score("scrum", "scrum") > 0.9);
    }

    #[test]
    fn test_short_names_fall_back_to_prefix() {
        assert!(similarity_score("qa", "qa") > 0.7);
        assert!(similarity_score("c#", "sql") < 0.1);
    }
}
