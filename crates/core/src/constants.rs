//! Constants used throughout the medcase core crate.
//!
//! Static scoring tables live here so that the parser, risk assessor and recommendation
//! generator share one definition of each vocabulary.

/// Version string reported with every analysis.
pub const AI_VERSION: &str = "1.0.0";

/// Age assumed when the caller does not supply one.
pub const DEFAULT_PATIENT_AGE: u8 = 30;

/// Severity recorded for a symptom flagged with a plain boolean.
pub const DEFAULT_SEVERITY: f64 = 5.0;

pub const MIN_SEVERITY: f64 = 1.0;
pub const MAX_SEVERITY: f64 = 10.0;

/// Duration assumed when the caller does not supply one.
pub const DEFAULT_DURATION_DAYS: u32 = 1;

/// Upper bound on the per-disease confidence percentage.
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Number of predictions kept after ranking.
pub const MAX_PREDICTIONS: usize = 5;

/// Number of predicted conditions copied onto a stored case.
pub const CASE_CONDITION_COUNT: usize = 3;

/// Symptom keys recognised in a structured payload.
pub const SYMPTOM_VOCABULARY: [&str; 20] = [
    "fever",
    "cough",
    "headache",
    "fatigue",
    "nausea",
    "vomiting",
    "diarrhea",
    "shortness_of_breath",
    "chest_pain",
    "sore_throat",
    "runny_nose",
    "body_aches",
    "chills",
    "dizziness",
    "abdominal_pain",
    "loss_of_taste",
    "loss_of_smell",
    "rash",
    "joint_pain",
    "back_pain",
];

/// String values that mark a symptom as absent (compared case-insensitively).
pub const NEGATIVE_ANSWERS: [&str; 4] = ["no", "false", "none", "0"];

/// Free-text keywords per symptom. Matching is a plain substring test on the lower-cased text.
pub const SYMPTOM_KEYWORDS: [(&str, &[&str]); 12] = [
    ("fever", &["fever", "temperature", "hot", "chills"]),
    ("cough", &["cough", "coughing", "hacking"]),
    ("headache", &["headache", "head pain", "migraine"]),
    ("fatigue", &["tired", "fatigue", "exhausted", "weak"]),
    ("nausea", &["nausea", "queasy", "sick to stomach"]),
    ("vomiting", &["vomit", "throwing up"]),
    ("diarrhea", &["diarrhea", "loose stool"]),
    (
        "shortness_of_breath",
        &["short of breath", "can't breathe", "breathless"],
    ),
    ("chest_pain", &["chest pain", "chest tightness", "heart pain"]),
    ("sore_throat", &["sore throat", "throat pain"]),
    ("runny_nose", &["runny nose", "nasal discharge"]),
    ("body_aches", &["body aches", "muscle pain", "joint pain"]),
];

/// Symptoms adding [`HIGH_RISK_POINTS`] each to the risk score.
pub const HIGH_RISK_SYMPTOMS: [&str; 6] = [
    "chest_pain",
    "shortness_of_breath",
    "severe_headache",
    "confusion",
    "unconsciousness",
    "severe_bleeding",
];

/// Symptoms adding [`MEDIUM_RISK_POINTS`] each to the risk score.
pub const MEDIUM_RISK_SYMPTOMS: [&str; 5] = [
    "high_fever",
    "severe_vomiting",
    "severe_diarrhea",
    "difficulty_swallowing",
    "severe_abdominal_pain",
];

pub const HIGH_RISK_POINTS: u32 = 3;
pub const MEDIUM_RISK_POINTS: u32 = 2;

/// Risk score at or above which urgency is high.
pub const HIGH_URGENCY_THRESHOLD: u32 = 8;

/// Risk score at or above which urgency is medium.
pub const MEDIUM_URGENCY_THRESHOLD: u32 = 5;

/// Note stored with every case assessment.
pub const EDUCATIONAL_NOTE: &str = "AI assessment for educational purposes only";
