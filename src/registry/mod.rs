//! Vocabulary & pattern registry.
//!
//! A [`RegistrySpec`] is plain data (TOML or the built-in tables). Compiling
//! it into a [`Registry`] validates the framework invariants and builds the
//! matchers the scanner runs. A compiled registry is immutable; swapping the
//! taxonomy means building a new one before the run starts.

pub mod builtin;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::error::{LensError, Result, suggest_similar_skills};

/// Serializable form of a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySpec {
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    /// Skill name -> literal aliases.
    #[serde(default)]
    pub explicit: BTreeMap<String, Vec<String>>,
    /// Skill name -> cue patterns.
    #[serde(default)]
    pub implicit: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Canonical key for a skill name: NFKC, lowercase, single spaces.
#[must_use]
pub fn normalize_skill(name: &str) -> String {
    name.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A framework category with its member skills in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub skills: Vec<String>,
}

/// Literal alias matcher for one explicit skill.
#[derive(Debug, Clone)]
pub struct ExplicitMatcher {
    pub skill: String,
    /// All aliases, longest first; finds candidate start positions.
    pub(crate) regex: Regex,
    /// Each alias anchored at the start of its input, longest first.
    pub(crate) anchored: Vec<Regex>,
}

impl ExplicitMatcher {
    /// Byte ranges of alias occurrences that sit on word boundaries.
    ///
    /// At each candidate start the aliases are tried longest first, so a
    /// longer alias cut off mid-word ("node.js" in "node.jsx") still lets a
    /// shorter one ("node") match there.
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        let mut at = 0;
        std::iter::from_fn(move || {
            while at <= text.len() {
                let start = self.regex.find_at(text, at)?.start();
                let rest = &text[start..];
                let found = self
                    .anchored
                    .iter()
                    .filter_map(|re| re.find(rest).map(|m| (start, start + m.end())))
                    .find(|&(s, e)| e > s && on_word_boundary(text, s, e));
                match found {
                    Some((s, e)) => {
                        at = e;
                        return Some((s, e));
                    }
                    None => at = start + rest.chars().next().map_or(1, char::len_utf8),
                }
            }
            None
        })
    }
}

/// Cue patterns for one implicit skill.
#[derive(Debug, Clone)]
pub struct ImplicitMatcher {
    pub skill: String,
    pub(crate) patterns: Vec<Regex>,
}

impl ImplicitMatcher {
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        self.patterns
            .iter()
            .flat_map(move |re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .filter(|&(start, end)| end > start)
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word-boundary check that only applies on sides where the match itself
/// starts or ends with a word character, so aliases like `c++` and `c#`
/// still match before punctuation.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let matched = &text[start..end];
    let first_is_word = matched.chars().next().is_some_and(is_word_char);
    let last_is_word = matched.chars().next_back().is_some_and(is_word_char);

    let before_ok = !first_is_word || !text[..start].chars().next_back().is_some_and(is_word_char);
    let after_ok = !last_is_word || !text[end..].chars().next().is_some_and(is_word_char);
    before_ok && after_ok
}

/// Compiled, validated taxonomy.
#[derive(Debug, Clone)]
pub struct Registry {
    categories: Vec<Category>,
    /// normalized skill -> (category index, display name)
    lookup: HashMap<String, (usize, String)>,
    explicit: Vec<ExplicitMatcher>,
    implicit: Vec<ImplicitMatcher>,
    fingerprint: String,
}

impl Registry {
    /// Compile the built-in taxonomy.
    pub fn builtin() -> Result<Self> {
        Self::from_spec(&builtin::builtin_spec())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let spec: RegistrySpec = toml::from_str(raw)
            .map_err(|err| LensError::InvalidRegistry(format!("parse registry: {err}")))?;
        Self::from_spec(&spec)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            LensError::InvalidRegistry(format!("read registry {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validate and compile a spec.
    ///
    /// Fails when a detectable skill has no category, a skill sits in more
    /// than one category, an alias is empty, or a pattern does not compile
    /// or can match the empty string.
    pub fn from_spec(spec: &RegistrySpec) -> Result<Self> {
        if spec.categories.is_empty() {
            return Err(LensError::InvalidRegistry(
                "registry defines no categories".to_string(),
            ));
        }

        let mut categories = Vec::with_capacity(spec.categories.len());
        let mut lookup: HashMap<String, (usize, String)> = HashMap::new();

        for (idx, category) in spec.categories.iter().enumerate() {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(LensError::InvalidRegistry(format!(
                    "category #{idx} has an empty name"
                )));
            }
            if categories.iter().any(|c: &Category| c.name == name) {
                return Err(LensError::InvalidRegistry(format!(
                    "category '{name}' is declared twice"
                )));
            }

            let mut skills = Vec::with_capacity(category.skills.len());
            for skill in &category.skills {
                let key = normalize_skill(skill);
                if key.is_empty() {
                    return Err(LensError::InvalidRegistry(format!(
                        "category '{name}' lists an empty skill name"
                    )));
                }
                if let Some(&(existing, _)) = lookup.get(&key) {
                    if existing == idx {
                        return Err(LensError::InvalidRegistry(format!(
                            "skill '{}' is listed twice in category '{name}'",
                            skill.trim()
                        )));
                    }
                    return Err(LensError::AmbiguousCategory {
                        skill: skill.trim().to_string(),
                        categories: vec![categories[existing].name.clone(), name.to_string()],
                    });
                }
                lookup.insert(key, (idx, skill.trim().to_string()));
                skills.push(skill.trim().to_string());
            }

            categories.push(Category {
                name: name.to_string(),
                skills,
            });
        }

        let known: Vec<&str> = lookup.values().map(|(_, display)| display.as_str()).collect();
        let display_for = |skill: &str| -> Result<String> {
            lookup
                .get(&normalize_skill(skill))
                .map(|(_, display)| display.clone())
                .ok_or_else(|| {
                    let mut similar = suggest_similar_skills(skill, &known, 3);
                    similar.sort();
                    LensError::UnmappedSkill {
                        skill: skill.to_string(),
                        similar,
                    }
                })
        };

        // Keys that normalize to the same skill share one matcher, otherwise
        // a single mention would be counted once per key.
        let explicit = group_by_skill(&spec.explicit, &display_for)?
            .into_iter()
            .map(|(display, aliases)| compile_explicit(display, &aliases))
            .collect::<Result<Vec<_>>>()?;
        let implicit = group_by_skill(&spec.implicit, &display_for)?
            .into_iter()
            .map(|(display, patterns)| compile_implicit(display, &patterns))
            .collect::<Result<Vec<_>>>()?;

        let fingerprint = fingerprint(spec)?;
        debug!(
            categories = categories.len(),
            explicit = explicit.len(),
            implicit = implicit.len(),
            fingerprint = %fingerprint,
            "compiled skill registry"
        );

        Ok(Self {
            categories,
            lookup,
            explicit,
            implicit,
            fingerprint,
        })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category of a skill, by any spelling that normalizes to its name.
    #[must_use]
    pub fn category_of(&self, skill: &str) -> Option<&str> {
        self.lookup
            .get(&normalize_skill(skill))
            .map(|(idx, _)| self.categories[*idx].name.as_str())
    }

    /// Display name of a skill as declared in the framework table.
    #[must_use]
    pub fn display_name(&self, skill: &str) -> Option<&str> {
        self.lookup
            .get(&normalize_skill(skill))
            .map(|(_, display)| display.as_str())
    }

    #[must_use]
    pub fn explicit_matchers(&self) -> &[ExplicitMatcher] {
        &self.explicit
    }

    #[must_use]
    pub fn implicit_matchers(&self) -> &[ImplicitMatcher] {
        &self.implicit
    }

    /// Number of skills in the framework table.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.lookup.len()
    }

    /// Short hash identifying this taxonomy version.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Merge table entries by resolved display name, keeping first-seen order
/// and dropping repeated entries.
fn group_by_skill(
    table: &BTreeMap<String, Vec<String>>,
    display_for: &impl Fn(&str) -> Result<String>,
) -> Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::with_capacity(table.len());
    for (skill, entries) in table {
        let display = display_for(skill)?;
        let idx = match grouped.iter().position(|(name, _)| *name == display) {
            Some(idx) => {
                let merged_into = &display;
                debug!(skill = %skill, merged_into = %merged_into, "merged duplicate registry key");
                idx
            }
            None => {
                grouped.push((display, Vec::new()));
                grouped.len() - 1
            }
        };
        let merged = &mut grouped[idx].1;
        for entry in entries {
            if !merged.iter().any(|e| e.trim() == entry.trim()) {
                merged.push(entry.clone());
            }
        }
    }
    Ok(grouped)
}

fn compile_explicit(skill: String, aliases: &[String]) -> Result<ExplicitMatcher> {
    let mut cleaned = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(LensError::InvalidRegistry(format!(
                "skill '{skill}' has an empty alias"
            )));
        }
        if !cleaned.iter().any(|c: &&str| c.eq_ignore_ascii_case(alias)) {
            cleaned.push(alias);
        }
    }
    if cleaned.is_empty() {
        return Err(LensError::InvalidRegistry(format!(
            "skill '{skill}' has no aliases"
        )));
    }

    // Longest first so "machine learning ops" wins over "machine learning".
    cleaned.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = cleaned
        .iter()
        .map(|alias| regex::escape(alias))
        .collect::<Vec<_>>()
        .join("|");

    let build = |pattern: &str| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| LensError::InvalidPattern {
                skill: skill.clone(),
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })
    };
    let regex = build(&alternation)?;
    let anchored = cleaned
        .iter()
        .map(|alias| build(&format!("^(?:{})", regex::escape(alias))))
        .collect::<Result<Vec<_>>>()?;

    Ok(ExplicitMatcher {
        skill,
        regex,
        anchored,
    })
}

fn compile_implicit(skill: String, patterns: &[String]) -> Result<ImplicitMatcher> {
    if patterns.is_empty() {
        return Err(LensError::InvalidRegistry(format!(
            "skill '{skill}' has no cue patterns"
        )));
    }

    let compiled = patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| LensError::InvalidPattern {
                    skill: skill.clone(),
                    pattern: pattern.clone(),
                    reason: err.to_string(),
                })
                .and_then(|re| {
                    if re.is_match("") {
                        Err(LensError::InvalidPattern {
                            skill: skill.clone(),
                            pattern: pattern.clone(),
                            reason: "pattern matches the empty string".to_string(),
                        })
                    } else {
                        Ok(re)
                    }
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ImplicitMatcher {
        skill,
        patterns: compiled,
    })
}

fn fingerprint(spec: &RegistrySpec) -> Result<String> {
    let canonical = serde_json::to_vec(spec)?;
    let digest = Sha256::digest(&canonical);
    let mut hex = hex::encode(digest);
    hex.truncate(16);
    Ok(hex)
}
