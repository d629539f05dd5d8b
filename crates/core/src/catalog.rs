//! Disease pattern catalog.
//!
//! The catalog is read-only once constructed. The built-in catalog is created lazily on first
//! use and shared by every analysis; a replacement can be loaded from YAML at startup (see
//! [`DiseaseCatalog::from_yaml_file`]) and validated before any request is served.
//!
//! ## YAML format
//!
//! ```yaml
//! - name: Common Cold
//!   core_symptoms: [runny_nose, sore_throat, sneezing]
//!   common_symptoms: [cough, congestion, mild_headache, fatigue]
//!   min_core_symptoms: 2
//!   urgency: low
//! ```
//!
//! `warning_symptoms` defaults to empty, `min_core_symptoms` to 1 and `urgency` to medium.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Urgency tier shared by disease patterns, risk assessments and recommendations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::InvalidInput(format!(
                "urgency must be low, medium or high, got '{}'",
                other
            ))),
        }
    }
}

fn default_min_core_symptoms() -> usize {
    1
}

/// A single catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseasePattern {
    pub name: String,
    pub core_symptoms: Vec<String>,
    #[serde(default)]
    pub common_symptoms: Vec<String>,
    #[serde(default)]
    pub warning_symptoms: Vec<String>,
    #[serde(default = "default_min_core_symptoms")]
    pub min_core_symptoms: usize,
    #[serde(default)]
    pub urgency: Urgency,
}

impl DiseasePattern {
    fn new(
        name: &str,
        core: &[&str],
        common: &[&str],
        warning: &[&str],
        min_core_symptoms: usize,
        urgency: Urgency,
    ) -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            name: name.to_string(),
            core_symptoms: owned(core),
            common_symptoms: owned(common),
            warning_symptoms: owned(warning),
            min_core_symptoms,
            urgency,
        }
    }

    /// Highest score this pattern can produce: `3×|core| + 2×|common| + 4×|warning|`.
    pub fn max_score(&self) -> u32 {
        let weight = |len: usize, w: u32| len as u32 * w;
        weight(self.core_symptoms.len(), 3)
            + weight(self.common_symptoms.len(), 2)
            + weight(self.warning_symptoms.len(), 4)
    }
}

/// Ordered collection of disease patterns. Iteration order is the tie-break order for equal
/// confidences.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiseaseCatalog {
    patterns: Vec<DiseasePattern>,
}

static BUILTIN: LazyLock<Arc<DiseaseCatalog>> = LazyLock::new(|| {
    use Urgency::{Low, Medium};

    Arc::new(DiseaseCatalog {
        patterns: vec![
            DiseasePattern::new(
                "Common Cold",
                &["runny_nose", "sore_throat", "sneezing"],
                &["cough", "congestion", "mild_headache", "fatigue"],
                &[],
                2,
                Low,
            ),
            DiseasePattern::new(
                "Influenza (Flu)",
                &["fever", "body_aches", "fatigue"],
                &["cough", "headache", "chills", "sore_throat"],
                &["high_fever", "difficulty_breathing"],
                2,
                Medium,
            ),
            DiseasePattern::new(
                "COVID-19",
                &["fever", "cough", "fatigue"],
                &["loss_of_taste", "loss_of_smell", "shortness_of_breath", "headache"],
                &["severe_shortness_of_breath", "chest_pain"],
                2,
                Medium,
            ),
            DiseasePattern::new(
                "Migraine",
                &["headache", "sensitivity_to_light"],
                &["nausea", "sensitivity_to_sound", "aura"],
                &[],
                2,
                Medium,
            ),
            DiseasePattern::new(
                "Gastroenteritis (Stomach Flu)",
                &["nausea", "vomiting", "diarrhea"],
                &["abdominal_pain", "fever", "body_aches"],
                &["severe_dehydration", "blood_in_stool"],
                2,
                Low,
            ),
            DiseasePattern::new(
                "Bronchitis",
                &["cough", "chest_discomfort"],
                &["fatigue", "shortness_of_breath", "mild_fever"],
                &[],
                2,
                Medium,
            ),
            DiseasePattern::new(
                "Urinary Tract Infection (UTI)",
                &["painful_urination", "frequent_urination"],
                &["abdominal_pain", "fever", "back_pain"],
                &[],
                2,
                Medium,
            ),
            DiseasePattern::new(
                "Anxiety/Panic Attack",
                &["shortness_of_breath", "chest_pain", "rapid_heartbeat"],
                &["dizziness", "sweating", "trembling"],
                &[],
                2,
                Medium,
            ),
        ],
    })
});

impl DiseaseCatalog {
    /// Returns the built-in catalog shared by the whole process.
    pub fn builtin() -> Arc<DiseaseCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Builds a catalog from explicit patterns after validating them.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCatalog`] if the patterns fail validation.
    pub fn new(patterns: Vec<DiseasePattern>) -> CoreResult<Self> {
        let catalog = Self { patterns };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CatalogParse`] with the path of the offending field if the YAML does
    /// not match the expected shape, or [`CoreError::InvalidCatalog`] if validation fails.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml);
        let patterns: Vec<DiseasePattern> = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| CoreError::CatalogParse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;
        Self::new(patterns)
    }

    /// Reads and parses a YAML catalog file.
    pub fn from_yaml_file(path: &Path) -> CoreResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(CoreError::CatalogRead)?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            "loaded {} disease patterns from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn patterns(&self) -> &[DiseasePattern] {
        &self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiseasePattern> {
        self.patterns.iter()
    }

    pub fn get(&self, name: &str) -> Option<&DiseasePattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();

        for pattern in &self.patterns {
            let name = pattern.name.trim();
            if name.is_empty() {
                return Err(CoreError::InvalidCatalog(
                    "disease name cannot be empty".into(),
                ));
            }
            if !seen.insert(name.to_string()) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate disease name '{}'",
                    name
                )));
            }
            if pattern.core_symptoms.is_empty() {
                return Err(CoreError::InvalidCatalog(format!(
                    "'{}' has no core symptoms",
                    name
                )));
            }
            if pattern.min_core_symptoms > pattern.core_symptoms.len() {
                return Err(CoreError::InvalidCatalog(format!(
                    "'{}' requires {} core symptoms but only lists {}",
                    name,
                    pattern.min_core_symptoms,
                    pattern.core_symptoms.len()
                )));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a DiseaseCatalog {
    type Item = &'a DiseasePattern;
    type IntoIter = std::slice::Iter<'a, DiseasePattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_is_valid_and_ordered() {
        let catalog = DiseaseCatalog::builtin();
        catalog.validate().expect("builtin catalog should validate");

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Common Cold",
                "Influenza (Flu)",
                "COVID-19",
                "Migraine",
                "Gastroenteritis (Stomach Flu)",
                "Bronchitis",
                "Urinary Tract Infection (UTI)",
                "Anxiety/Panic Attack",
            ]
        );
    }

    #[test]
    fn test_max_score_weights() {
        let catalog = DiseaseCatalog::builtin();
        assert_eq!(catalog.get("COVID-19").unwrap().max_score(), 25);
        assert_eq!(catalog.get("Common Cold").unwrap().max_score(), 17);
        assert_eq!(catalog.get("Bronchitis").unwrap().max_score(), 12);
    }

    #[test]
    fn test_yaml_defaults_applied() {
        let catalog = DiseaseCatalog::from_yaml_str(
            "- name: Sinusitis\n  core_symptoms: [facial_pain, congestion]\n",
        )
        .unwrap();

        let pattern = catalog.get("Sinusitis").unwrap();
        assert!(pattern.common_symptoms.is_empty());
        assert!(pattern.warning_symptoms.is_empty());
        assert_eq!(pattern.min_core_symptoms, 1);
        assert_eq!(pattern.urgency, Urgency::Medium);
    }

    #[test]
    fn test_yaml_parse_error_reports_path() {
        let err = DiseaseCatalog::from_yaml_str(
            "- name: Sinusitis\n  core_symptoms: [facial_pain]\n  urgency: critical\n",
        )
        .unwrap_err();

        match err {
            CoreError::CatalogParse { path, .. } => assert!(path.contains("urgency")),
            other => panic!("expected CatalogParse, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = DiseaseCatalog::from_yaml_str(
            "- name: Flu\n  core_symptoms: [fever]\n- name: Flu\n  core_symptoms: [cough]\n",
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_unreachable_threshold() {
        let err = DiseaseCatalog::from_yaml_str(
            "- name: Flu\n  core_symptoms: [fever]\n  min_core_symptoms: 2\n",
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "- name: Tonsillitis\n  core_symptoms: [sore_throat, fever]\n  urgency: low"
        )
        .unwrap();

        let catalog = DiseaseCatalog::from_yaml_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.patterns()[0].urgency, Urgency::Low);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = DiseaseCatalog::from_yaml_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(matches!(err, CoreError::CatalogRead(_)));
    }
}
