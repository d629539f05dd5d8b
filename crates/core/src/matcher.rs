//! Disease matching.
//!
//! Scores every catalog pattern against a parsed symptom set. Core symptoms count three points
//! each but only once the pattern's `min_core_symptoms` gate is met; common symptoms count two
//! and warning symptoms four, ungated. Warning symptoms raise the score without being listed as
//! matches.

use crate::catalog::{DiseaseCatalog, DiseasePattern, Urgency};
use crate::constants::{MAX_CONFIDENCE, MAX_PREDICTIONS};
use crate::symptoms::SymptomInput;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiseasePrediction {
    pub disease: String,
    /// Percentage in `[0, 95]`, one decimal place.
    pub confidence: f64,
    pub matching_symptoms: Vec<String>,
    pub missing_symptoms: Vec<String>,
    pub urgency: Urgency,
}

/// Returns at most five predictions, highest confidence first.
///
/// Equal confidences keep catalog order. Patterns scoring zero are omitted, so an empty symptom
/// set always yields an empty list.
pub fn match_diseases(catalog: &DiseaseCatalog, symptoms: &SymptomInput) -> Vec<DiseasePrediction> {
    let mut predictions: Vec<DiseasePrediction> = catalog
        .iter()
        .filter_map(|pattern| score_pattern(pattern, symptoms))
        .collect();

    // sort_by is stable, which preserves catalog order on ties.
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(MAX_PREDICTIONS);
    predictions
}

fn score_pattern(pattern: &DiseasePattern, symptoms: &SymptomInput) -> Option<DiseasePrediction> {
    let present = |list: &[String]| -> Vec<String> {
        list.iter().filter(|s| symptoms.contains(s)).cloned().collect()
    };

    let core = present(&pattern.core_symptoms);
    let common = present(&pattern.common_symptoms);
    let warning = present(&pattern.warning_symptoms);

    let mut score = 0u32;
    let mut matching: Vec<String> = Vec::new();

    if core.len() >= pattern.min_core_symptoms {
        score += 3 * core.len() as u32;
        matching.extend(core);
    }
    score += 2 * common.len() as u32;
    for symptom in common {
        if !matching.contains(&symptom) {
            matching.push(symptom);
        }
    }
    score += 4 * warning.len() as u32;

    if score == 0 {
        return None;
    }

    let max_score = pattern.max_score();
    let raw = f64::from(score) / f64::from(max_score) * 100.0;
    let confidence = round_to(raw.min(MAX_CONFIDENCE), 1);

    let mut missing: Vec<String> = Vec::new();
    for symptom in pattern.core_symptoms.iter().chain(&pattern.common_symptoms) {
        if !symptoms.contains(symptom) && !missing.contains(symptom) {
            missing.push(symptom.clone());
        }
    }

    Some(DiseasePrediction {
        disease: pattern.name.clone(),
        confidence,
        matching_symptoms: matching,
        missing_symptoms: missing,
        urgency: pattern.urgency,
    })
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
