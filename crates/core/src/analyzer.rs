//! The symptom analysis pipeline.
//!
//! [`Analyzer::analyze`] runs parse → match → assess → recommend over read-only tables and
//! returns one [`AnalysisResult`]. Nothing is cached between calls, so any number of requests may
//! share an `Analyzer` without coordination.

use crate::catalog::DiseaseCatalog;
use crate::constants::AI_VERSION;
use crate::error::AnalysisError;
use crate::matcher::{self, round_to, DiseasePrediction};
use crate::patient::PatientInfo;
use crate::recommendations::{self, Recommendations};
use crate::risk::{self, RiskAssessment};
use crate::symptoms::{self, SymptomInput, SymptomPayload};
use chrono::{DateTime, Utc};
use medcase_uuid::AnalysisId;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    pub analysis_id: AnalysisId,
    pub patient_info: PatientInfo,
    pub symptoms_analyzed: SymptomInput,
    pub disease_predictions: Vec<DiseasePrediction>,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Recommendations,
    /// Aggregate confidence in `[0, 1]`.
    pub confidence_score: f64,
    pub analysis_timestamp: DateTime<Utc>,
    pub ai_version: String,
}

impl AnalysisResult {
    pub fn top_prediction(&self) -> Option<&DiseasePrediction> {
        self.disease_predictions.first()
    }
}

#[derive(Clone, Debug)]
pub struct Analyzer {
    catalog: Arc<DiseaseCatalog>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DiseaseCatalog::builtin())
    }
}

impl Analyzer {
    pub fn new(catalog: Arc<DiseaseCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Analyses one symptom payload for one patient.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Failed`] if scoring produced a non-finite confidence, which only
    /// happens with a malformed catalog.
    pub fn analyze(
        &self,
        payload: &SymptomPayload,
        patient: &PatientInfo,
    ) -> Result<AnalysisResult, AnalysisError> {
        let parsed = symptoms::parse(payload);
        let predictions = matcher::match_diseases(&self.catalog, &parsed);

        if let Some(bad) = predictions.iter().find(|p| !p.confidence.is_finite()) {
            tracing::error!(disease = %bad.disease, "non-finite confidence");
            return Err(AnalysisError::Failed(format!(
                "non-finite confidence for '{}'",
                bad.disease
            )));
        }

        let risk_assessment = risk::assess(&parsed, patient);
        let recommendations = recommendations::recommend(&predictions, &risk_assessment);
        let confidence_score = aggregate_confidence(&predictions);

        let analysis_id = AnalysisId::generate();
        tracing::debug!(
            analysis_id = %analysis_id,
            symptoms = parsed.symptoms.len(),
            predictions = predictions.len(),
            risk_score = risk_assessment.risk_score,
            urgency = %risk_assessment.urgency_level,
            "symptom analysis complete"
        );

        Ok(AnalysisResult {
            analysis_timestamp: analysis_id.timestamp(),
            analysis_id,
            patient_info: patient.clone(),
            symptoms_analyzed: parsed,
            disease_predictions: predictions,
            risk_assessment,
            recommendations,
            confidence_score,
            ai_version: AI_VERSION.to_string(),
        })
    }
}

/// Aggregate confidence in `[0, 1]`, two decimal places.
///
/// The top prediction's confidence is discounted by 0.9 when there are two candidates and 0.8
/// when there are three or more.
pub fn aggregate_confidence(predictions: &[DiseasePrediction]) -> f64 {
    let Some(top) = predictions.first() else {
        return 0.0;
    };
    let factor = match predictions.len() {
        1 => 1.0,
        2 => 0.9,
        _ => 0.8,
    };
    round_to(top.confidence * factor / 100.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Urgency;
    use crate::symptoms::SymptomValue;

    fn flags(names: &[&str]) -> SymptomPayload {
        names.iter().fold(SymptomPayload::default(), |p, name| {
            p.with_symptom(*name, SymptomValue::Flag(true))
        })
    }

    #[test]
    fn test_respiratory_analysis() {
        let analyzer = Analyzer::default();
        let result = analyzer
            .analyze(&flags(&["fever", "cough", "fatigue"]), &PatientInfo::default())
            .unwrap();

        assert_eq!(result.disease_predictions.len(), 5);
        assert_eq!(result.top_prediction().unwrap().disease, "COVID-19");
        // 36.0 × 0.8 / 100
        assert_eq!(result.confidence_score, 0.29);
        assert_eq!(result.risk_assessment.urgency_level, Urgency::Low);
        assert_eq!(result.recommendations.medical_tests, ["COVID-19 test"]);
        assert_eq!(result.ai_version, "1.0.0");
        assert_eq!(result.analysis_timestamp, result.analysis_id.timestamp());
    }

    #[test]
    fn test_unmatched_description_falls_back() {
        let payload = SymptomPayload {
            symptom_description: Some("I feel odd".into()),
            ..SymptomPayload::default()
        };
        let result = Analyzer::default()
            .analyze(&payload, &PatientInfo::default())
            .unwrap();

        assert!(result.symptoms_analyzed.is_empty());
        assert!(result.disease_predictions.is_empty());
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.risk_assessment.risk_score, 0);
        assert_eq!(result.risk_assessment.urgency_level, Urgency::Low);
        assert_eq!(
            result.recommendations.home_care,
            ["Rest", "Stay hydrated", "Monitor symptoms"]
        );
    }

    #[test]
    fn test_repeated_analysis_is_identical_apart_from_id() {
        let analyzer = Analyzer::default();
        let payload = flags(&["headache", "nausea", "chest_pain"]);
        let patient = PatientInfo {
            is_smoker: true,
            ..PatientInfo::with_age(67)
        };

        let a = analyzer.analyze(&payload, &patient).unwrap();
        let b = analyzer.analyze(&payload, &patient).unwrap();

        assert_ne!(a.analysis_id, b.analysis_id);
        assert_eq!(a.symptoms_analyzed, b.symptoms_analyzed);
        assert_eq!(a.disease_predictions, b.disease_predictions);
        assert_eq!(a.risk_assessment, b.risk_assessment);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(a.confidence_score, b.confidence_score);
    }

    #[test]
    fn test_aggregate_confidence_discounts() {
        let prediction = |confidence| DiseasePrediction {
            disease: "x".into(),
            confidence,
            matching_symptoms: vec![],
            missing_symptoms: vec![],
            urgency: Urgency::Low,
        };

        assert_eq!(aggregate_confidence(&[]), 0.0);
        assert_eq!(aggregate_confidence(&[prediction(60.0)]), 0.6);
        assert_eq!(aggregate_confidence(&[prediction(60.0), prediction(10.0)]), 0.54);
        assert_eq!(
            aggregate_confidence(&[prediction(95.0), prediction(10.0), prediction(5.0)]),
            0.76
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let result = Analyzer::default()
            .analyze(&flags(&["cough"]), &PatientInfo::default())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        for key in [
            "analysis_id",
            "patient_info",
            "symptoms_analyzed",
            "disease_predictions",
            "risk_assessment",
            "recommendations",
            "confidence_score",
            "analysis_timestamp",
            "ai_version",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["symptoms_analyzed"]["primary_symptoms"][0], "cough");
    }
}
