use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LensError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Resolve configuration layers.
    ///
    /// An explicit file (argument or `TLENS_CONFIG`) replaces the global and
    /// project files. Environment overrides always apply last.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("TLENS_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                LensError::Config(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tlens/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = project_root.join("tlens.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| LensError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| LensError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.scan {
            self.scan.merge(patch);
        }
        if let Some(patch) = patch.evidence {
            self.evidence.merge(patch);
        }
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
        if let Some(patch) = patch.registry {
            self.registry.merge(patch);
        }
        if let Some(patch) = patch.export {
            self.export.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = parse_var::<usize>(&lookup, "TLENS_SCAN_SNIPPET_WINDOW")? {
            self.scan.snippet_window = value;
        }
        if let Some(value) = parse_var::<usize>(&lookup, "TLENS_SCAN_MAX_DOCUMENT_BYTES")? {
            self.scan.max_document_bytes = value;
        }
        if let Some(value) = bool_var(&lookup, "TLENS_SCAN_PARALLEL") {
            self.scan.parallel = value;
        }
        if let Some(value) = parse_var::<usize>(&lookup, "TLENS_SCAN_PARALLEL_THRESHOLD")? {
            self.scan.parallel_threshold = value;
        }

        if let Some(value) = parse_var::<usize>(&lookup, "TLENS_EVIDENCE_MAX_SNIPPETS")? {
            self.evidence.max_snippets = value;
        }

        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_OCCURRENCE_WEIGHT")? {
            self.scoring.occurrence_weight = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_DIVERSITY_WEIGHT")? {
            self.scoring.diversity_weight = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_DETECTION_WEIGHT")? {
            self.scoring.detection_weight = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_OCCURRENCE_SATURATION")? {
            self.scoring.occurrence_saturation = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_DIVERSITY_SATURATION")? {
            self.scoring.diversity_saturation = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_EXPLICIT_STRENGTH")? {
            self.scoring.explicit_strength = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_IMPLICIT_STRENGTH")? {
            self.scoring.implicit_strength = value;
        }
        if let Some(value) = parse_var::<f64>(&lookup, "TLENS_SCORING_MIN_CONFIDENCE")? {
            self.scoring.min_confidence = value;
        }

        if let Some(value) = lookup("TLENS_REGISTRY_PATH").filter(|v| !v.trim().is_empty()) {
            self.registry.path = Some(PathBuf::from(value));
        }

        if let Some(value) = bool_var(&lookup, "TLENS_EXPORT_PRETTY") {
            self.export.pretty = value;
        }
        if let Some(value) = parse_var::<u32>(&lookup, "TLENS_EXPORT_PRECISION")? {
            self.export.precision = value;
        }

        Ok(())
    }

    /// Reject values that would make scoring meaningless.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        let weights = [
            ("scoring.occurrence_weight", s.occurrence_weight),
            ("scoring.diversity_weight", s.diversity_weight),
            ("scoring.detection_weight", s.detection_weight),
            ("scoring.explicit_strength", s.explicit_strength),
            ("scoring.implicit_strength", s.implicit_strength),
        ];
        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(LensError::Config(format!(
                    "{key} must be a non-negative number (got {value})"
                )));
            }
        }
        if s.occurrence_weight + s.diversity_weight + s.detection_weight <= 0.0 {
            return Err(LensError::Config(
                "scoring weights must not all be zero".to_string(),
            ));
        }
        // Two sources must outweigh repeated mentions in one document.
        if s.diversity_weight <= s.occurrence_weight {
            return Err(LensError::Config(format!(
                "scoring.diversity_weight ({}) must be greater than scoring.occurrence_weight ({})",
                s.diversity_weight, s.occurrence_weight
            )));
        }
        if s.explicit_strength <= s.implicit_strength {
            return Err(LensError::Config(format!(
                "scoring.explicit_strength ({}) must be greater than scoring.implicit_strength ({})",
                s.explicit_strength, s.implicit_strength
            )));
        }
        for (key, value) in [
            ("scoring.occurrence_saturation", s.occurrence_saturation),
            ("scoring.diversity_saturation", s.diversity_saturation),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LensError::Config(format!(
                    "{key} must be greater than zero (got {value})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&s.min_confidence) {
            return Err(LensError::Config(format!(
                "scoring.min_confidence must be within [0, 1] (got {})",
                s.min_confidence
            )));
        }
        if self.evidence.max_snippets == 0 {
            return Err(LensError::Config(
                "evidence.max_snippets must be at least 1".to_string(),
            ));
        }
        if self.export.precision > 12 {
            return Err(LensError::Config(format!(
                "export.precision must be at most 12 (got {})",
                self.export.precision
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub snippet_window: usize,
    pub max_document_bytes: usize,
    pub parallel: bool,
    pub parallel_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            snippet_window: 90,
            max_document_bytes: 5 * 1024 * 1024,
            parallel: true,
            parallel_threshold: 8,
        }
    }
}

impl ScanConfig {
    fn merge(&mut self, patch: ScanPatch) {
        if let Some(value) = patch.snippet_window {
            self.snippet_window = value;
        }
        if let Some(value) = patch.max_document_bytes {
            self.max_document_bytes = value;
        }
        if let Some(value) = patch.parallel {
            self.parallel = value;
        }
        if let Some(value) = patch.parallel_threshold {
            self.parallel_threshold = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    pub max_snippets: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self { max_snippets: 5 }
    }
}

impl EvidenceConfig {
    fn merge(&mut self, patch: EvidencePatch) {
        if let Some(value) = patch.max_snippets {
            self.max_snippets = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub occurrence_weight: f64,
    pub diversity_weight: f64,
    pub detection_weight: f64,
    pub occurrence_saturation: f64,
    pub diversity_saturation: f64,
    pub explicit_strength: f64,
    pub implicit_strength: f64,
    pub min_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            occurrence_weight: 0.25,
            diversity_weight: 0.45,
            detection_weight: 0.30,
            occurrence_saturation: 5.0,
            diversity_saturation: 3.0,
            explicit_strength: 1.0,
            implicit_strength: 0.6,
            min_confidence: 0.0,
        }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringPatch) {
        if let Some(value) = patch.occurrence_weight {
            self.occurrence_weight = value;
        }
        if let Some(value) = patch.diversity_weight {
            self.diversity_weight = value;
        }
        if let Some(value) = patch.detection_weight {
            self.detection_weight = value;
        }
        if let Some(value) = patch.occurrence_saturation {
            self.occurrence_saturation = value;
        }
        if let Some(value) = patch.diversity_saturation {
            self.diversity_saturation = value;
        }
        if let Some(value) = patch.explicit_strength {
            self.explicit_strength = value;
        }
        if let Some(value) = patch.implicit_strength {
            self.implicit_strength = value;
        }
        if let Some(value) = patch.min_confidence {
            self.min_confidence = value;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// TOML registry replacing the built-in taxonomy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl RegistryConfig {
    fn merge(&mut self, patch: RegistryPatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub pretty: bool,
    pub precision: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            precision: 3,
        }
    }
}

impl ExportConfig {
    fn merge(&mut self, patch: ExportPatch) {
        if let Some(value) = patch.pretty {
            self.pretty = value;
        }
        if let Some(value) = patch.precision {
            self.precision = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub scan: Option<ScanPatch>,
    pub evidence: Option<EvidencePatch>,
    pub scoring: Option<ScoringPatch>,
    pub registry: Option<RegistryPatch>,
    pub export: Option<ExportPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScanPatch {
    pub snippet_window: Option<usize>,
    pub max_document_bytes: Option<usize>,
    pub parallel: Option<bool>,
    pub parallel_threshold: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EvidencePatch {
    pub max_snippets: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringPatch {
    pub occurrence_weight: Option<f64>,
    pub diversity_weight: Option<f64>,
    pub detection_weight: Option<f64>,
    pub occurrence_saturation: Option<f64>,
    pub diversity_saturation: Option<f64>,
    pub explicit_strength: Option<f64>,
    pub implicit_strength: Option<f64>,
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RegistryPatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExportPatch {
    pub pretty: Option<bool>,
    pub precision: Option<u32>,
}

fn bool_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
            LensError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}
