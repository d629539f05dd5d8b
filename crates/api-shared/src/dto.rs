//! Request and response bodies for the medcase APIs.
//!
//! These are the wire shapes only. Each request type validates itself at the boundary and
//! converts into the core's types; each response type is built from a core value with `From`.

use medcase_core::{
    Account, AiAssessment, AnalysisResult, CaseReview, CaseStats, CaseSymptoms, DiseaseCatalog,
    DiseasePattern, DiseasePrediction, Gender, MedicalCase, PatientInfo, PatientRegistration,
    Prescription, Recommendations, RiskAssessment, SymptomPayload, SymptomValue,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// A request body failed boundary validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn default_duration_days() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub ai_version: String,
}

/// Symptom analysis request.
///
/// `symptoms` maps symptom names to `true`, a severity number or a free-text answer. Unknown
/// names and non-scalar values are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SymptomAnalysisReq {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub symptoms: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub symptom_description: Option<String>,
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    pub age: u32,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub has_chronic_conditions: bool,
    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub is_immunocompromised: bool,
}

impl SymptomAnalysisReq {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=365).contains(&self.duration_days) {
            return Err(ValidationError(
                "duration_days must be between 1 and 365".into(),
            ));
        }
        if self.age > 120 {
            return Err(ValidationError("age must be between 0 and 120".into()));
        }
        if let Some(gender) = &self.gender {
            gender
                .parse::<Gender>()
                .map_err(|e| ValidationError(e.to_string()))?;
        }
        Ok(())
    }

    /// Validates and splits the request into the parser payload and the patient factors.
    pub fn into_parts(self) -> Result<(SymptomPayload, PatientInfo), ValidationError> {
        self.validate()?;

        let gender = self
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()
            .map_err(|e| ValidationError(e.to_string()))?;
        let age = u8::try_from(self.age)
            .map_err(|_| ValidationError("age must be between 0 and 120".into()))?;

        let payload = SymptomPayload {
            symptoms: self
                .symptoms
                .iter()
                .filter_map(|(name, value)| {
                    SymptomValue::from_json(value).map(|v| (name.clone(), v))
                })
                .collect(),
            symptom_description: self.symptom_description,
            duration_days: Some(self.duration_days),
            temperature: self.temperature,
        };
        let patient = PatientInfo {
            age,
            gender,
            has_chronic_conditions: self.has_chronic_conditions,
            is_pregnant: self.is_pregnant,
            is_immunocompromised: self.is_immunocompromised,
            is_smoker: self.is_smoker,
        };

        Ok((payload, patient))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientInfoRes {
    pub age: u8,
    pub gender: Option<String>,
    pub has_chronic_conditions: bool,
    pub is_pregnant: bool,
    pub is_immunocompromised: bool,
    pub is_smoker: bool,
}

impl From<PatientInfo> for PatientInfoRes {
    fn from(p: PatientInfo) -> Self {
        Self {
            age: p.age,
            gender: p.gender.map(|g| {
                match g {
                    Gender::Male => "male",
                    Gender::Female => "female",
                    Gender::Other => "other",
                }
                .to_string()
            }),
            has_chronic_conditions: p.has_chronic_conditions,
            is_pregnant: p.is_pregnant,
            is_immunocompromised: p.is_immunocompromised,
            is_smoker: p.is_smoker,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SymptomsAnalyzedRes {
    pub primary_symptoms: Vec<String>,
    pub severity_scores: BTreeMap<String, f64>,
    pub symptom_details: BTreeMap<String, String>,
    pub duration_days: u32,
    pub symptom_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DiseasePredictionRes {
    pub disease: String,
    pub confidence: f64,
    pub matching_symptoms: Vec<String>,
    pub missing_symptoms: Vec<String>,
    pub urgency: String,
}

impl From<DiseasePrediction> for DiseasePredictionRes {
    fn from(p: DiseasePrediction) -> Self {
        Self {
            disease: p.disease,
            confidence: p.confidence,
            matching_symptoms: p.matching_symptoms,
            missing_symptoms: p.missing_symptoms,
            urgency: p.urgency.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessmentRes {
    pub risk_score: u32,
    pub urgency_level: String,
    pub recommended_action: String,
    pub max_wait_time: String,
    pub warning_signs: Vec<String>,
    pub patient_risk_factors: Vec<String>,
}

impl From<RiskAssessment> for RiskAssessmentRes {
    fn from(r: RiskAssessment) -> Self {
        Self {
            risk_score: r.risk_score,
            urgency_level: r.urgency_level.to_string(),
            recommended_action: r.recommended_action,
            max_wait_time: r.max_wait_time,
            warning_signs: r.warning_signs,
            patient_risk_factors: r.patient_risk_factors,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsRes {
    pub immediate_actions: Vec<String>,
    pub medical_tests: Vec<String>,
    pub home_care: Vec<String>,
    pub medications: Vec<String>,
    pub follow_up: Vec<String>,
}

impl From<Recommendations> for RecommendationsRes {
    fn from(r: Recommendations) -> Self {
        Self {
            immediate_actions: r.immediate_actions,
            medical_tests: r.medical_tests,
            home_care: r.home_care,
            medications: r.medications,
            follow_up: r.follow_up,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRes {
    pub analysis_id: String,
    pub patient_info: PatientInfoRes,
    pub symptoms_analyzed: SymptomsAnalyzedRes,
    pub disease_predictions: Vec<DiseasePredictionRes>,
    pub risk_assessment: RiskAssessmentRes,
    pub recommendations: RecommendationsRes,
    pub confidence_score: f64,
    pub analysis_timestamp: String,
    pub ai_version: String,
}

impl From<AnalysisResult> for AnalysisRes {
    fn from(r: AnalysisResult) -> Self {
        let symptoms = r.symptoms_analyzed;
        Self {
            analysis_id: r.analysis_id.to_string(),
            patient_info: r.patient_info.into(),
            symptoms_analyzed: SymptomsAnalyzedRes {
                primary_symptoms: symptoms.symptoms,
                severity_scores: symptoms.severity,
                symptom_details: symptoms.details,
                duration_days: symptoms.duration_days,
                symptom_text: symptoms.description,
                temperature: symptoms.temperature,
            },
            disease_predictions: r.disease_predictions.into_iter().map(Into::into).collect(),
            risk_assessment: r.risk_assessment.into(),
            recommendations: r.recommendations.into(),
            confidence_score: r.confidence_score,
            analysis_timestamp: r.analysis_timestamp.to_rfc3339(),
            ai_version: r.ai_version,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DiseasePatternRes {
    pub name: String,
    pub core_symptoms: Vec<String>,
    pub common_symptoms: Vec<String>,
    pub warning_symptoms: Vec<String>,
    pub min_core_symptoms: usize,
    pub urgency: String,
}

impl From<&DiseasePattern> for DiseasePatternRes {
    fn from(p: &DiseasePattern) -> Self {
        Self {
            name: p.name.clone(),
            core_symptoms: p.core_symptoms.clone(),
            common_symptoms: p.common_symptoms.clone(),
            warning_symptoms: p.warning_symptoms.clone(),
            min_core_symptoms: p.min_core_symptoms,
            urgency: p.urgency.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogRes {
    pub patterns: Vec<DiseasePatternRes>,
}

impl From<&DiseaseCatalog> for CatalogRes {
    fn from(catalog: &DiseaseCatalog) -> Self {
        Self {
            patterns: catalog.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub agree_to_terms: bool,
    #[serde(default)]
    pub acknowledge_educational: bool,
}

impl From<RegisterReq> for PatientRegistration {
    fn from(r: RegisterReq) -> Self {
        Self {
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            agree_to_terms: r.agree_to_terms,
            acknowledge_educational: r.acknowledge_educational,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountRes {
    pub id: String,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Account> for AccountRes {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.to_string(),
            email: a.email.to_string(),
            role: a.role.to_string(),
            full_name: a.full_name(),
            first_name: a.first_name.into_inner(),
            last_name: a.last_name.into_inner(),
            is_active: a.is_active,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseSymptomsDto {
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

impl From<CaseSymptomsDto> for CaseSymptoms {
    fn from(s: CaseSymptomsDto) -> Self {
        Self {
            description: s.description,
            duration_hours: s.duration_hours,
            severity: s.severity,
            temperature: s.temperature,
            has_fever: s.has_fever,
            has_cough: s.has_cough,
            has_headache: s.has_headache,
            has_nausea: s.has_nausea,
            has_fatigue: s.has_fatigue,
            additional_notes: s.additional_notes,
        }
    }
}

impl From<CaseSymptoms> for CaseSymptomsDto {
    fn from(s: CaseSymptoms) -> Self {
        Self {
            description: s.description,
            duration_hours: s.duration_hours,
            severity: s.severity,
            temperature: s.temperature,
            has_fever: s.has_fever,
            has_cough: s.has_cough,
            has_headache: s.has_headache,
            has_nausea: s.has_nausea,
            has_fatigue: s.has_fatigue,
            additional_notes: s.additional_notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitCaseReq {
    pub patient_id: String,
    pub symptoms: CaseSymptomsDto,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AiAssessmentRes {
    pub possible_conditions: Vec<String>,
    pub confidence_score: f64,
    pub recommended_tests: Vec<String>,
    pub urgency_level: String,
    pub educational_note: String,
}

impl From<AiAssessment> for AiAssessmentRes {
    fn from(a: AiAssessment) -> Self {
        Self {
            possible_conditions: a.possible_conditions,
            confidence_score: a.confidence_score,
            recommended_tests: a.recommended_tests,
            urgency_level: a.urgency_level.to_string(),
            educational_note: a.educational_note,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionDto {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration_days: u16,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

impl From<PrescriptionDto> for Prescription {
    fn from(p: PrescriptionDto) -> Self {
        let warning = p.warning.unwrap_or_else(|| {
            "This is a simulated prescription for educational purposes only. Do not use for actual medical treatment.".into()
        });
        Self {
            medication_name: p.medication_name,
            dosage: p.dosage,
            frequency: p.frequency,
            duration_days: p.duration_days,
            instructions: p.instructions,
            warning,
        }
    }
}

impl From<Prescription> for PrescriptionDto {
    fn from(p: Prescription) -> Self {
        Self {
            medication_name: p.medication_name,
            dosage: p.dosage,
            frequency: p.frequency,
            duration_days: p.duration_days,
            instructions: p.instructions,
            warning: Some(p.warning),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseRes {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub symptoms: CaseSymptomsDto,
    pub ai_assessment: AiAssessmentRes,
    pub status: String,
    pub doctor_diagnosis: Option<String>,
    pub doctor_notes: Option<String>,
    pub prescription: Option<PrescriptionDto>,
    pub follow_up_required: bool,
    pub follow_up_days: Option<u16>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
    pub updated_at: String,
}

impl From<MedicalCase> for CaseRes {
    fn from(c: MedicalCase) -> Self {
        Self {
            id: c.id.to_string(),
            patient_id: c.patient_id.to_string(),
            doctor_id: c.doctor_id.map(|id| id.to_string()),
            symptoms: c.symptoms.into(),
            ai_assessment: c.ai_assessment.into(),
            status: c.status.to_string(),
            doctor_diagnosis: c.doctor_diagnosis,
            doctor_notes: c.doctor_notes,
            prescription: c.prescription.map(Into::into),
            follow_up_required: c.follow_up_required,
            follow_up_days: c.follow_up_days,
            created_at: c.created_at.to_rfc3339(),
            reviewed_at: c.reviewed_at.map(|t| t.to_rfc3339()),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCasesRes {
    pub cases: Vec<CaseRes>,
}

impl FromIterator<MedicalCase> for ListCasesRes {
    fn from_iter<I: IntoIterator<Item = MedicalCase>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCasesQuery {
    /// Only cases submitted by this patient.
    pub patient_id: Option<String>,
    /// One of `pending_review`, `in_review`, `completed`.
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StartReviewReq {
    pub doctor_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewCaseReq {
    pub doctor_id: String,
    pub doctor_diagnosis: String,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    #[serde(default)]
    pub prescription: Option<PrescriptionDto>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_days: Option<u16>,
}

impl ReviewCaseReq {
    /// Splits off the doctor id, returning the review body.
    pub fn into_review(self) -> (String, CaseReview) {
        (
            self.doctor_id,
            CaseReview {
                doctor_diagnosis: self.doctor_diagnosis,
                doctor_notes: self.doctor_notes,
                prescription: self.prescription.map(Into::into),
                follow_up_required: self.follow_up_required,
                follow_up_days: self.follow_up_days,
            },
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    pub total_cases: usize,
    pub pending_review: usize,
    pub in_review: usize,
    pub completed: usize,
    pub total_users: usize,
    pub ai_version: String,
}

impl From<CaseStats> for StatsRes {
    fn from(s: CaseStats) -> Self {
        Self {
            total_cases: s.total_cases,
            pending_review: s.pending_review,
            in_review: s.in_review,
            completed: s.completed,
            total_users: s.total_users,
            ai_version: medcase_core::constants::AI_VERSION.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> SymptomAnalysisReq {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_analysis_request_defaults() {
        let req = request(json!({"age": 40}));
        assert_eq!(req.duration_days, 1);
        assert!(req.symptoms.is_empty());

        let (payload, patient) = req.into_parts().unwrap();
        assert_eq!(payload.duration_days, Some(1));
        assert_eq!(patient.age, 40);
        assert_eq!(patient.gender, None);
    }

    #[test]
    fn test_analysis_request_requires_age() {
        let err = serde_json::from_value::<SymptomAnalysisReq>(json!({"symptoms": {}}));
        assert!(err.is_err());
    }

    #[test]
    fn test_analysis_request_bounds() {
        assert!(request(json!({"age": 121})).validate().is_err());
        assert!(request(json!({"age": 30, "duration_days": 0})).validate().is_err());
        assert!(request(json!({"age": 30, "duration_days": 366})).validate().is_err());
        assert!(request(json!({"age": 30, "gender": "robot"})).validate().is_err());
        assert!(request(json!({"age": 120, "gender": "Female"})).validate().is_ok());
    }

    #[test]
    fn test_symptom_values_converted() {
        let (payload, patient) = request(json!({
            "age": 70,
            "gender": "male",
            "has_chronic_conditions": true,
            "symptoms": {"fever": true, "cough": 7, "rash": "mild", "notes": ["x"], "chills": null},
        }))
        .into_parts()
        .unwrap();

        assert_eq!(payload.symptoms.len(), 3);
        assert_eq!(payload.symptoms.get("cough"), Some(&SymptomValue::Level(7.0)));
        assert_eq!(patient.gender, Some(Gender::Male));
        assert!(patient.has_chronic_conditions);
    }

    #[test]
    fn test_analysis_response_keeps_temperature() {
        let (payload, patient) = request(json!({
            "age": 30,
            "temperature": 38.6,
            "symptoms": {"fever": true},
        }))
        .into_parts()
        .unwrap();
        let result = medcase_core::Analyzer::default()
            .analyze(&payload, &patient)
            .unwrap();

        let res = AnalysisRes::from(result);
        assert_eq!(res.symptoms_analyzed.temperature, Some(38.6));

        let body = serde_json::to_value(&res).unwrap();
        assert_eq!(body["symptoms_analyzed"]["temperature"], 38.6);
    }

    #[test]
    fn test_review_request_split() {
        let req: ReviewCaseReq = serde_json::from_value(json!({
            "doctor_id": "abc",
            "doctor_diagnosis": "Migraine",
            "prescription": {
                "medication_name": "Sumatriptan",
                "dosage": "50mg",
                "frequency": "as needed",
                "duration_days": 10,
            },
        }))
        .unwrap();

        let (doctor_id, review) = req.into_review();
        assert_eq!(doctor_id, "abc");
        let prescription = review.prescription.unwrap();
        assert!(prescription.warning.starts_with("This is a simulated prescription"));
        assert!(!review.follow_up_required);
    }
}
