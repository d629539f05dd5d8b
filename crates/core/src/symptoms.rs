//! Symptom parsing.
//!
//! Normalises a loosely-typed symptom payload into a [`SymptomInput`]: a de-duplicated symptom
//! list, per-symptom severities and any free-text details. Parsing is lenient and never fails;
//! unknown keys and unusable values are dropped.

use crate::constants::{
    DEFAULT_DURATION_DAYS, DEFAULT_SEVERITY, MAX_SEVERITY, MIN_SEVERITY, NEGATIVE_ANSWERS,
    SYMPTOM_KEYWORDS, SYMPTOM_VOCABULARY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single symptom answer as supplied by a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymptomValue {
    Flag(bool),
    Level(f64),
    Text(String),
}

impl SymptomValue {
    /// Converts an arbitrary JSON value, returning `None` for nulls, arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Flag(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Level),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

/// Raw symptom payload handed to the parser.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomPayload {
    #[serde(default)]
    pub symptoms: BTreeMap<String, SymptomValue>,
    #[serde(default)]
    pub symptom_description: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl SymptomPayload {
    /// Builds a payload from a flat JSON object.
    ///
    /// `symptom_description`, `duration_days` and `temperature` are lifted into their fields;
    /// every other scalar entry becomes a symptom answer. Entries of the wrong type are ignored.
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut payload = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "symptom_description" => {
                    payload.symptom_description = value.as_str().map(str::to_owned);
                }
                "duration_days" => {
                    payload.duration_days = value.as_u64().and_then(|d| u32::try_from(d).ok());
                }
                "temperature" => payload.temperature = value.as_f64(),
                _ => {
                    if let Some(answer) = SymptomValue::from_json(value) {
                        payload.symptoms.insert(key.clone(), answer);
                    }
                }
            }
        }

        payload
    }

    pub fn with_symptom(mut self, name: impl Into<String>, value: SymptomValue) -> Self {
        self.symptoms.insert(name.into(), value);
        self
    }
}

/// Canonical, parsed symptom set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SymptomInput {
    #[serde(rename = "primary_symptoms")]
    pub symptoms: Vec<String>,
    #[serde(rename = "severity_scores")]
    pub severity: BTreeMap<String, f64>,
    #[serde(rename = "symptom_details")]
    pub details: BTreeMap<String, String>,
    pub duration_days: u32,
    #[serde(rename = "symptom_text")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl SymptomInput {
    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    fn add(&mut self, symptom: &str) {
        if !self.contains(symptom) {
            self.symptoms.push(symptom.to_string());
        }
    }
}

/// Parses a raw payload into a [`SymptomInput`].
pub fn parse(payload: &SymptomPayload) -> SymptomInput {
    let mut parsed = SymptomInput {
        duration_days: payload
            .duration_days
            .unwrap_or(DEFAULT_DURATION_DAYS)
            .max(DEFAULT_DURATION_DAYS),
        description: payload.symptom_description.clone().unwrap_or_default(),
        temperature: payload.temperature,
        ..SymptomInput::default()
    };

    for symptom in SYMPTOM_VOCABULARY {
        match payload.symptoms.get(symptom) {
            Some(SymptomValue::Flag(true)) => {
                parsed.add(symptom);
                parsed.severity.insert(symptom.to_string(), DEFAULT_SEVERITY);
            }
            Some(SymptomValue::Level(level)) if *level > 0.0 => {
                parsed.add(symptom);
                parsed
                    .severity
                    .insert(symptom.to_string(), level.clamp(MIN_SEVERITY, MAX_SEVERITY));
            }
            Some(SymptomValue::Text(text)) if is_affirmative(text) => {
                parsed.add(symptom);
                parsed.details.insert(symptom.to_string(), text.clone());
            }
            _ => {}
        }
    }

    if !parsed.description.is_empty() {
        for symptom in extract_from_text(&parsed.description) {
            parsed.add(symptom);
        }
    }

    parsed
}

fn is_affirmative(text: &str) -> bool {
    let lower = text.to_lowercase();
    !text.is_empty() && !NEGATIVE_ANSWERS.contains(&lower.as_str())
}

/// Returns the symptoms whose keywords occur anywhere in `text`.
///
/// This is a substring test, so "hot" also fires inside "shot" or "photo".
pub fn extract_from_text(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    SYMPTOM_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(symptom, _)| *symptom)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> SymptomPayload {
        SymptomPayload::from_json_map(value.as_object().expect("object"))
    }

    #[test]
    fn test_boolean_flag_defaults_to_moderate_severity() {
        let parsed = parse(&payload(json!({"cough": true, "headache": false})));

        assert_eq!(parsed.symptoms, ["cough"]);
        assert_eq!(parsed.severity.get("cough"), Some(&5.0));
        assert!(!parsed.contains("headache"));
    }

    #[test]
    fn test_numeric_severity_is_clamped() {
        let parsed = parse(&payload(json!({"headache": 14, "nausea": 0.4, "cough": 0})));

        assert_eq!(parsed.severity.get("headache"), Some(&10.0));
        assert_eq!(parsed.severity.get("nausea"), Some(&1.0));
        assert!(!parsed.contains("cough"));
    }

    #[test]
    fn test_string_answers() {
        let parsed = parse(&payload(json!({
            "rash": "itchy on arms",
            "cough": "No",
            "fever": "FALSE",
            "fatigue": "none",
            "chills": "0",
        })));

        assert_eq!(parsed.symptoms, ["rash"]);
        assert_eq!(parsed.details.get("rash").map(String::as_str), Some("itchy on arms"));
        assert!(parsed.severity.is_empty());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let parsed = parse(&payload(json!({"sneezing": true, "age": 40, "notes": {"a": 1}})));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_vocabulary_order_then_text_order() {
        let parsed = parse(&payload(json!({
            "headache": true,
            "fever": true,
            "symptom_description": "feeling exhausted and throwing up",
        })));

        assert_eq!(parsed.symptoms, ["fever", "headache", "fatigue", "vomiting"]);
    }

    #[test]
    fn test_text_does_not_duplicate_flags() {
        let parsed = parse(&payload(json!({
            "cough": 3,
            "symptom_description": "bad cough and a fever",
        })));

        assert_eq!(parsed.symptoms, ["cough", "fever"]);
        assert_eq!(parsed.severity.get("cough"), Some(&3.0));
        assert!(!parsed.severity.contains_key("fever"));
    }

    #[test]
    fn test_keyword_matching_is_plain_substring() {
        // "hot" inside "photos" counts as a fever keyword.
        assert_eq!(extract_from_text("Uploaded some photos"), ["fever"]);
        assert_eq!(extract_from_text("Weakness after a shot"), ["fever", "fatigue"]);
    }

    #[test]
    fn test_unmatched_description_yields_empty_set() {
        let parsed = parse(&payload(json!({"symptom_description": "I feel odd"})));

        assert!(parsed.is_empty());
        assert_eq!(parsed.description, "I feel odd");
    }

    #[test]
    fn test_duration_defaults_and_floor() {
        assert_eq!(parse(&SymptomPayload::default()).duration_days, 1);
        assert_eq!(parse(&payload(json!({"duration_days": 0}))).duration_days, 1);
        assert_eq!(parse(&payload(json!({"duration_days": 21}))).duration_days, 21);
        assert_eq!(parse(&payload(json!({"duration_days": -3}))).duration_days, 1);
    }

    #[test]
    fn test_temperature_retained() {
        let parsed = parse(&payload(json!({"temperature": 38.2})));
        assert_eq!(parsed.temperature, Some(38.2));
    }
}
