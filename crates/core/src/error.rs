use medcase_uuid::RecordId;

/// Failure of the scoring pipeline.
///
/// The pipeline is deterministic, so there is nothing to retry: callers translate this into a
/// user-facing error and move on.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] medcase_types::TextError),
    #[error("invalid identifier: {0}")]
    Identifier(#[from] medcase_uuid::UuidError),

    #[error("failed to read catalog file: {0}")]
    CatalogRead(std::io::Error),
    #[error("invalid catalog YAML at '{path}': {message}")]
    CatalogParse { path: String, message: String },
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("terms and educational acknowledgement must both be accepted")]
    TermsNotAccepted,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account not found: {0}")]
    AccountNotFound(RecordId),
    #[error("account {0} is not a doctor")]
    NotADoctor(RecordId),

    #[error("case not found: {0}")]
    CaseNotFound(RecordId),
    #[error("case cannot move from {from} to {to}")]
    InvalidCaseTransition {
        from: crate::cases::CaseStatus,
        to: crate::cases::CaseStatus,
    },

    #[error("repository lock poisoned")]
    RepositoryPoisoned,
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
