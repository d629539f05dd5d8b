//! Patient demographic factors used by the risk assessor.

use crate::constants::DEFAULT_PATIENT_AGE;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(CoreError::InvalidInput(format!(
                "gender must be male, female or other, got '{}'",
                other
            ))),
        }
    }
}

fn default_age() -> u8 {
    DEFAULT_PATIENT_AGE
}

/// Demographic and history flags for the patient being assessed. Immutable per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default = "default_age")]
    pub age: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub has_chronic_conditions: bool,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub is_immunocompromised: bool,
    #[serde(default)]
    pub is_smoker: bool,
}

impl Default for PatientInfo {
    fn default() -> Self {
        Self {
            age: DEFAULT_PATIENT_AGE,
            gender: None,
            has_chronic_conditions: false,
            is_pregnant: false,
            is_immunocompromised: false,
            is_smoker: false,
        }
    }
}

impl PatientInfo {
    pub fn with_age(age: u8) -> Self {
        Self {
            age,
            ..Self::default()
        }
    }
}
