//! Care recommendations assembled from urgency tier and the top-ranked disease.

use crate::catalog::Urgency;
use crate::matcher::DiseasePrediction;
use crate::risk::RiskAssessment;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub immediate_actions: Vec<String>,
    pub medical_tests: Vec<String>,
    pub home_care: Vec<String>,
    pub medications: Vec<String>,
    pub follow_up: Vec<String>,
}

struct CareTemplate {
    disease: &'static str,
    medical_tests: &'static [&'static str],
    home_care: &'static [&'static str],
    medications: &'static [&'static str],
    follow_up: &'static [&'static str],
}

const CARE_TEMPLATES: &[CareTemplate] = &[
    CareTemplate {
        disease: "Common Cold",
        medical_tests: &[],
        home_care: &["Rest", "Stay hydrated", "Use saline nasal spray"],
        medications: &["Acetaminophen for fever", "Decongestants if needed"],
        follow_up: &[],
    },
    CareTemplate {
        disease: "Influenza (Flu)",
        medical_tests: &["Influenza test"],
        home_care: &["Isolate from others", "Rest", "Hydrate"],
        medications: &["Antiviral medication (if early)", "Fever reducers"],
        follow_up: &[],
    },
    CareTemplate {
        disease: "COVID-19",
        medical_tests: &["COVID-19 test"],
        home_care: &[
            "Isolate for 5 days",
            "Wear mask around others",
            "Monitor oxygen levels",
        ],
        medications: &[],
        follow_up: &["Check temperature twice daily"],
    },
    CareTemplate {
        disease: "Migraine",
        medical_tests: &[],
        home_care: &["Rest in dark, quiet room", "Apply cold compress"],
        medications: &["Prescribed migraine medication", "Pain relievers"],
        follow_up: &[],
    },
    CareTemplate {
        disease: "Gastroenteritis (Stomach Flu)",
        medical_tests: &[],
        home_care: &[
            "BRAT diet (bananas, rice, applesauce, toast)",
            "Small sips of water",
        ],
        medications: &["Anti-nausea medication", "Rehydration solutions"],
        follow_up: &[],
    },
];

const FALLBACK_HOME_CARE: [&str; 3] = ["Rest", "Stay hydrated", "Monitor symptoms"];

fn immediate_actions(urgency: Urgency) -> &'static [&'static str] {
    match urgency {
        Urgency::High => &[
            "Call emergency services (911/112)",
            "Do not drive yourself",
            "Have someone stay with you",
        ],
        Urgency::Medium => &["Contact your doctor today", "Rest and monitor symptoms"],
        Urgency::Low => &[],
    }
}

fn owned<'a>(list: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    list.iter().map(|s| s.to_string())
}

/// Builds recommendations for one analysis.
///
/// `home_care` is never empty: when no template matches the top prediction the generic
/// rest/hydrate/monitor advice is used.
pub fn recommend(predictions: &[DiseasePrediction], risk: &RiskAssessment) -> Recommendations {
    let mut recs = Recommendations::default();
    recs.immediate_actions
        .extend(owned(immediate_actions(risk.urgency_level)));

    let template = predictions
        .first()
        .and_then(|top| CARE_TEMPLATES.iter().find(|t| t.disease == top.disease));
    if let Some(template) = template {
        recs.home_care.extend(owned(template.home_care));
        recs.medical_tests.extend(owned(template.medical_tests));
        recs.medications.extend(owned(template.medications));
        recs.follow_up.extend(owned(template.follow_up));
    }

    if recs.home_care.is_empty() {
        recs.home_care.extend(owned(&FALLBACK_HOME_CARE));
    }

    recs
}
