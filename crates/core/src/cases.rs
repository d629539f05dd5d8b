//! Medical cases: patient submissions, their stored AI summary and the doctor review workflow.
//!
//! A case moves `pending_review → in_review → completed`. A doctor may also complete a pending
//! case directly. Completed cases are final.

use crate::accounts::AccountService;
use crate::analyzer::{AnalysisResult, Analyzer};
use crate::catalog::Urgency;
use crate::constants::{CASE_CONDITION_COUNT, EDUCATIONAL_NOTE};
use crate::error::{CoreError, CoreResult};
use crate::patient::PatientInfo;
use crate::repositories::CaseRepository;
use crate::symptoms::{SymptomPayload, SymptomValue};
use chrono::{DateTime, Utc};
use medcase_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    PendingReview,
    InReview,
    Completed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingReview => "pending_review",
            Self::InReview => "in_review",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending_review" => Ok(Self::PendingReview),
            "in_review" => Ok(Self::InReview),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidInput(format!(
                "unknown case status '{}'",
                other
            ))),
        }
    }
}

/// The case-submission form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseSymptoms {
    pub description: String,
    pub duration_hours: u32,
    pub severity: u8,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub has_fever: bool,
    #[serde(default)]
    pub has_cough: bool,
    #[serde(default)]
    pub has_headache: bool,
    #[serde(default)]
    pub has_nausea: bool,
    #[serde(default)]
    pub has_fatigue: bool,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl CaseSymptoms {
    pub fn validate(&self) -> CoreResult<()> {
        if self.description.trim().is_empty() {
            return Err(CoreError::InvalidInput("description cannot be empty".into()));
        }
        if !(1..=720).contains(&self.duration_hours) {
            return Err(CoreError::InvalidInput(
                "duration_hours must be between 1 and 720".into(),
            ));
        }
        if !(1..=10).contains(&self.severity) {
            return Err(CoreError::InvalidInput(
                "severity must be between 1 and 10".into(),
            ));
        }
        if let Some(t) = self.temperature {
            if !(35.0..=42.0).contains(&t) {
                return Err(CoreError::InvalidInput(
                    "temperature must be between 35 and 42 °C".into(),
                ));
            }
        }
        Ok(())
    }

    /// Converts the form into an analyzer payload.
    ///
    /// Checked boxes become symptoms at the form's severity. Hours round up to whole days.
    pub fn to_payload(&self) -> SymptomPayload {
        let flags = [
            ("fever", self.has_fever),
            ("cough", self.has_cough),
            ("headache", self.has_headache),
            ("nausea", self.has_nausea),
            ("fatigue", self.has_fatigue),
        ];

        let mut payload = SymptomPayload {
            symptom_description: Some(self.description.clone()),
            duration_days: Some(self.duration_hours.div_ceil(24)),
            temperature: self.temperature,
            ..SymptomPayload::default()
        };
        for (name, checked) in flags {
            if checked {
                payload = payload.with_symptom(name, SymptomValue::Level(f64::from(self.severity)));
            }
        }
        payload
    }
}

/// AI summary stored with a case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub possible_conditions: Vec<String>,
    pub confidence_score: f64,
    pub recommended_tests: Vec<String>,
    pub urgency_level: Urgency,
    pub educational_note: String,
}

impl AiAssessment {
    pub fn from_analysis(result: &AnalysisResult) -> Self {
        Self {
            possible_conditions: result
                .disease_predictions
                .iter()
                .take(CASE_CONDITION_COUNT)
                .map(|p| p.disease.clone())
                .collect(),
            confidence_score: result.confidence_score,
            recommended_tests: result.recommendations.medical_tests.clone(),
            urgency_level: result.risk_assessment.urgency_level,
            educational_note: EDUCATIONAL_NOTE.to_string(),
        }
    }

    /// Stored when the analyzer fails.
    pub fn fallback() -> Self {
        Self {
            possible_conditions: vec!["General Assessment Needed".into()],
            confidence_score: 0.5,
            recommended_tests: vec!["Physical Examination".into()],
            urgency_level: Urgency::Low,
            educational_note: "Fallback assessment - AI unavailable".into(),
        }
    }
}

fn default_prescription_warning() -> String {
    "This is a simulated prescription for educational purposes only. Do not use for actual medical treatment.".into()
}

/// Simulated prescription attached to a review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration_days: u16,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default = "default_prescription_warning")]
    pub warning: String,
}

impl Prescription {
    fn validate(&self) -> CoreResult<()> {
        for (field, value) in [
            ("medication_name", &self.medication_name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!("{field} cannot be empty")));
            }
        }
        if !(1..=90).contains(&self.duration_days) {
            return Err(CoreError::InvalidInput(
                "prescription duration_days must be between 1 and 90".into(),
            ));
        }
        Ok(())
    }
}

/// A doctor's review of a case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReview {
    pub doctor_diagnosis: String,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    #[serde(default)]
    pub prescription: Option<Prescription>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_days: Option<u16>,
}

impl CaseReview {
    pub fn validate(&self) -> CoreResult<()> {
        if self.doctor_diagnosis.trim().chars().count() < 3 {
            return Err(CoreError::InvalidInput(
                "doctor_diagnosis must be at least 3 characters".into(),
            ));
        }
        if let Some(days) = self.follow_up_days {
            if !(1..=365).contains(&days) {
                return Err(CoreError::InvalidInput(
                    "follow_up_days must be between 1 and 365".into(),
                ));
            }
        }
        if let Some(prescription) = &self.prescription {
            prescription.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MedicalCase {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub doctor_id: Option<RecordId>,
    pub symptoms: CaseSymptoms,
    pub ai_assessment: AiAssessment,
    pub status: CaseStatus,
    pub doctor_diagnosis: Option<String>,
    pub doctor_notes: Option<String>,
    pub prescription: Option<Prescription>,
    pub follow_up_required: bool,
    pub follow_up_days: Option<u16>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub patient_id: Option<RecordId>,
    pub status: Option<CaseStatus>,
}

impl CaseFilter {
    fn matches(&self, case: &MedicalCase) -> bool {
        self.patient_id.is_none_or(|id| case.patient_id == id)
            && self.status.is_none_or(|status| case.status == status)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaseStats {
    pub total_cases: usize,
    pub pending_review: usize,
    pub in_review: usize,
    pub completed: usize,
    pub total_users: usize,
}

#[derive(Clone)]
pub struct CaseService {
    cases: Arc<dyn CaseRepository>,
    accounts: AccountService,
    analyzer: Analyzer,
}

impl CaseService {
    pub fn new(cases: Arc<dyn CaseRepository>, accounts: AccountService, analyzer: Analyzer) -> Self {
        Self {
            cases,
            accounts,
            analyzer,
        }
    }

    /// Validates the form, runs the analyzer and stores a new pending case.
    ///
    /// Analysis failure is not an error here: the fallback assessment is stored instead.
    pub fn submit(&self, patient_id: RecordId, symptoms: CaseSymptoms) -> CoreResult<MedicalCase> {
        symptoms.validate()?;
        self.accounts.get(patient_id)?;

        let ai_assessment = match self
            .analyzer
            .analyze(&symptoms.to_payload(), &PatientInfo::default())
        {
            Ok(result) => AiAssessment::from_analysis(&result),
            Err(e) => {
                tracing::warn!("AI assessment failed, storing fallback: {}", e);
                AiAssessment::fallback()
            }
        };

        let now = Utc::now();
        let case = MedicalCase {
            id: RecordId::new(),
            patient_id,
            doctor_id: None,
            symptoms,
            ai_assessment,
            status: CaseStatus::PendingReview,
            doctor_diagnosis: None,
            doctor_notes: None,
            prescription: None,
            follow_up_required: false,
            follow_up_days: None,
            created_at: now,
            reviewed_at: None,
            updated_at: now,
        };

        let case = self.cases.create(case)?;
        tracing::info!(case_id = %case.id, patient_id = %patient_id, "case submitted");
        Ok(case)
    }

    pub fn get(&self, id: RecordId) -> CoreResult<MedicalCase> {
        self.cases.get(id)?.ok_or(CoreError::CaseNotFound(id))
    }

    /// Cases matching `filter`, newest first.
    pub fn list(&self, filter: &CaseFilter) -> CoreResult<Vec<MedicalCase>> {
        let mut cases: Vec<MedicalCase> = self
            .cases
            .list()?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cases)
    }

    /// Open cases for doctors: pending before in-review, newest first within each.
    pub fn review_queue(&self) -> CoreResult<Vec<MedicalCase>> {
        let mut cases: Vec<MedicalCase> = self
            .cases
            .list()?
            .into_iter()
            .filter(|c| c.status != CaseStatus::Completed)
            .collect();
        cases.sort_by(|a, b| {
            let rank = |c: &MedicalCase| (c.status != CaseStatus::PendingReview) as u8;
            rank(a)
                .cmp(&rank(b))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(cases)
    }

    /// Assigns a pending case to a doctor.
    pub fn start_review(&self, case_id: RecordId, doctor_id: RecordId) -> CoreResult<MedicalCase> {
        self.accounts.require_doctor(doctor_id)?;

        let case = self.cases.update_with(case_id, &mut |case| {
            if case.status != CaseStatus::PendingReview {
                return Err(CoreError::InvalidCaseTransition {
                    from: case.status,
                    to: CaseStatus::InReview,
                });
            }
            case.status = CaseStatus::InReview;
            case.doctor_id = Some(doctor_id);
            case.updated_at = Utc::now();
            Ok(())
        })?;

        tracing::info!(case_id = %case_id, doctor_id = %doctor_id, "case review started");
        Ok(case)
    }

    /// Completes a case with the doctor's diagnosis.
    ///
    /// Completed cases are final: of several reviews racing on one case, exactly one succeeds.
    pub fn review(
        &self,
        case_id: RecordId,
        doctor_id: RecordId,
        review: CaseReview,
    ) -> CoreResult<MedicalCase> {
        review.validate()?;
        self.accounts.require_doctor(doctor_id)?;

        let case = self.cases.update_with(case_id, &mut |case| {
            if case.status == CaseStatus::Completed {
                return Err(CoreError::InvalidCaseTransition {
                    from: case.status,
                    to: CaseStatus::Completed,
                });
            }

            let now = Utc::now();
            case.status = CaseStatus::Completed;
            case.doctor_id = Some(doctor_id);
            case.doctor_diagnosis = Some(review.doctor_diagnosis.trim().to_string());
            case.doctor_notes = review.doctor_notes.clone();
            case.prescription = review.prescription.clone();
            case.follow_up_required = review.follow_up_required;
            case.follow_up_days = review.follow_up_days;
            case.reviewed_at = Some(now);
            case.updated_at = now;
            Ok(())
        })?;

        tracing::info!(case_id = %case_id, doctor_id = %doctor_id, "case reviewed");
        Ok(case)
    }

    pub fn stats(&self) -> CoreResult<CaseStats> {
        let cases = self.cases.list()?;
        let count = |status| cases.iter().filter(|c| c.status == status).count();

        Ok(CaseStats {
            total_cases: cases.len(),
            pending_review: count(CaseStatus::PendingReview),
            in_review: count(CaseStatus::InReview),
            completed: count(CaseStatus::Completed),
            total_users: self.accounts.count()?,
        })
    }
}
