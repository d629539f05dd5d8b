//! # Medcase Core
//!
//! Core business logic for the medcase symptom assessment service.
//!
//! This crate contains the rule-based scoring pipeline and the account/case services:
//! - Symptom parsing, disease matching, risk assessment and recommendations ([`Analyzer`])
//! - The disease catalog, built in or loaded from YAML at startup
//! - Accounts and medical cases behind repository traits, with in-memory implementations
//!
//! **No API concerns**: HTTP servers, authentication and wire formats belong in `api-rest` or
//! `api-shared`.

pub mod accounts;
pub mod analyzer;
pub mod cases;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod matcher;
pub mod patient;
pub mod recommendations;
pub mod repositories;
pub mod risk;
pub mod seed;
pub mod symptoms;

pub use accounts::{Account, AccountService, PatientRegistration, Role};
pub use analyzer::{AnalysisResult, Analyzer};
pub use cases::{
    AiAssessment, CaseFilter, CaseReview, CaseService, CaseStats, CaseStatus, CaseSymptoms,
    MedicalCase, Prescription,
};
pub use catalog::{DiseaseCatalog, DiseasePattern, Urgency};
pub use config::CoreConfig;
pub use error::{AnalysisError, CoreError, CoreResult};
pub use matcher::DiseasePrediction;
pub use patient::{Gender, PatientInfo};
pub use recommendations::Recommendations;
pub use risk::RiskAssessment;
pub use symptoms::{SymptomInput, SymptomPayload, SymptomValue};

pub use medcase_types::{EmailAddress, NonEmptyText};
pub use medcase_uuid::{AnalysisId, RecordId};
