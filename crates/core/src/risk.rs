//! Risk and urgency assessment.
//!
//! The risk score is additive: symptom points from two fixed tables, then patient age,
//! chronic-condition and pregnancy points, then duration points. Patient risk-factor labels are
//! derived separately and are display-only; they never feed back into the score.

use crate::catalog::Urgency;
use crate::constants::{
    HIGH_RISK_POINTS, HIGH_RISK_SYMPTOMS, HIGH_URGENCY_THRESHOLD, MEDIUM_RISK_POINTS,
    MEDIUM_RISK_SYMPTOMS, MEDIUM_URGENCY_THRESHOLD,
};
use crate::patient::PatientInfo;
use crate::symptoms::SymptomInput;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub urgency_level: Urgency,
    pub recommended_action: String,
    pub max_wait_time: String,
    pub warning_signs: Vec<String>,
    pub patient_risk_factors: Vec<String>,
}

/// Assesses risk for one request. Pure and deterministic.
pub fn assess(symptoms: &SymptomInput, patient: &PatientInfo) -> RiskAssessment {
    let mut risk_score = 0;
    let mut warning_signs = Vec::new();

    let weighted = HIGH_RISK_SYMPTOMS
        .iter()
        .map(|s| (*s, HIGH_RISK_POINTS))
        .chain(MEDIUM_RISK_SYMPTOMS.iter().map(|s| (*s, MEDIUM_RISK_POINTS)));
    for (symptom, points) in weighted {
        if symptoms.contains(symptom) {
            risk_score += points;
            warning_signs.push(symptom.to_string());
        }
    }

    risk_score += age_points(patient.age);
    if patient.has_chronic_conditions {
        risk_score += 2;
    }
    if patient.is_pregnant {
        risk_score += 1;
    }
    risk_score += duration_points(symptoms.duration_days);

    let (urgency_level, action, wait) = urgency_for_score(risk_score);

    RiskAssessment {
        risk_score,
        urgency_level,
        recommended_action: action.to_string(),
        max_wait_time: wait.to_string(),
        warning_signs,
        patient_risk_factors: patient_risk_factors(patient),
    }
}

fn age_points(age: u8) -> u32 {
    if age >= 65 {
        2
    } else if age <= 5 {
        1
    } else {
        0
    }
}

/// Points for symptom duration. Both brackets apply past 30 days, giving 3 in total.
pub fn duration_points(duration_days: u32) -> u32 {
    let mut points = 0;
    if duration_days > 14 {
        points += 1;
    }
    if duration_days > 30 {
        points += 2;
    }
    points
}

/// Maps a risk score to its urgency tier, recommended action and maximum wait.
pub fn urgency_for_score(score: u32) -> (Urgency, &'static str, &'static str) {
    if score >= HIGH_URGENCY_THRESHOLD {
        (Urgency::High, "Seek emergency care immediately", "0-2 hours")
    } else if score >= MEDIUM_URGENCY_THRESHOLD {
        (Urgency::Medium, "See doctor within 24 hours", "24 hours")
    } else {
        (
            Urgency::Low,
            "Schedule appointment when convenient",
            "2-3 days",
        )
    }
}

/// Human-readable risk-factor labels for display.
pub fn patient_risk_factors(patient: &PatientInfo) -> Vec<String> {
    let mut factors = Vec::new();

    if patient.age >= 65 {
        factors.push("Age 65+");
    } else if patient.age <= 5 {
        factors.push("Age under 5");
    }
    if patient.has_chronic_conditions {
        factors.push("Chronic health conditions");
    }
    if patient.is_smoker {
        factors.push("Smoker");
    }
    if patient.is_pregnant {
        factors.push("Pregnancy");
    }
    if patient.is_immunocompromised {
        factors.push("Weakened immune system");
    }

    factors.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptoms(names: &[&str], duration_days: u32) -> SymptomInput {
        SymptomInput {
            symptoms: names.iter().map(|s| s.to_string()).collect(),
            duration_days,
            ..SymptomInput::default()
        }
    }

    #[test]
    fn test_empty_input_is_low_risk() {
        let risk = assess(&symptoms(&[], 1), &PatientInfo::default());

        assert_eq!(risk.risk_score, 0);
        assert_eq!(risk.urgency_level, Urgency::Low);
        assert_eq!(risk.recommended_action, "Schedule appointment when convenient");
        assert_eq!(risk.max_wait_time, "2-3 days");
        assert!(risk.warning_signs.is_empty());
        assert!(risk.patient_risk_factors.is_empty());
    }

    #[test]
    fn test_elderly_chronic_chest_pain_is_medium() {
        let patient = PatientInfo {
            has_chronic_conditions: true,
            ..PatientInfo::with_age(70)
        };
        let risk = assess(&symptoms(&["chest_pain"], 1), &patient);

        assert_eq!(risk.risk_score, 7);
        assert_eq!(risk.urgency_level, Urgency::Medium);
        assert_eq!(risk.recommended_action, "See doctor within 24 hours");
        assert_eq!(risk.max_wait_time, "24 hours");
        assert_eq!(risk.warning_signs, ["chest_pain"]);
        assert_eq!(
            risk.patient_risk_factors,
            ["Age 65+", "Chronic health conditions"]
        );
    }

    #[test]
    fn test_high_urgency_threshold() {
        let patient = PatientInfo {
            has_chronic_conditions: true,
            ..PatientInfo::with_age(70)
        };
        let risk = assess(&symptoms(&["chest_pain", "high_fever"], 1), &patient);

        assert_eq!(risk.risk_score, 9);
        assert_eq!(risk.urgency_level, Urgency::High);
        assert_eq!(risk.recommended_action, "Seek emergency care immediately");
        assert_eq!(risk.max_wait_time, "0-2 hours");
        assert_eq!(risk.warning_signs, ["chest_pain", "high_fever"]);
    }

    #[test]
    fn test_duration_brackets_compound() {
        assert_eq!(duration_points(14), 0);
        assert_eq!(duration_points(15), 1);
        assert_eq!(duration_points(30), 1);
        assert_eq!(duration_points(35), 3);

        let risk = assess(&symptoms(&[], 35), &PatientInfo::default());
        assert_eq!(risk.risk_score, 3);
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(assess(&symptoms(&[], 1), &PatientInfo::with_age(65)).risk_score, 2);
        assert_eq!(assess(&symptoms(&[], 1), &PatientInfo::with_age(5)).risk_score, 1);
        assert_eq!(assess(&symptoms(&[], 1), &PatientInfo::with_age(0)).risk_score, 1);
        assert_eq!(assess(&symptoms(&[], 1), &PatientInfo::with_age(6)).risk_score, 0);
    }

    #[test]
    fn test_display_only_factors_do_not_score() {
        let patient = PatientInfo {
            is_smoker: true,
            is_immunocompromised: true,
            is_pregnant: true,
            ..PatientInfo::with_age(3)
        };
        let risk = assess(&symptoms(&[], 1), &patient);

        // age <= 5 (+1) and pregnancy (+1) only.
        assert_eq!(risk.risk_score, 2);
        assert_eq!(
            risk.patient_risk_factors,
            ["Age under 5", "Smoker", "Pregnancy", "Weakened immune system"]
        );
    }

    #[test]
    fn test_medium_threshold_boundary() {
        let patient = PatientInfo {
            has_chronic_conditions: true,
            ..PatientInfo::default()
        };
        let risk = assess(&symptoms(&["shortness_of_breath"], 1), &patient);
        assert_eq!(risk.risk_score, 5);
        assert_eq!(risk.urgency_level, Urgency::Medium);
    }
}
