//! Record and analysis identifiers.
//!
//! Medcase identifies accounts and medical cases with a *canonical* UUID representation:
//! **32 lowercase hexadecimal characters** (no hyphens), e.g.
//! `550e8400e29b41d4a716446655440000`.
//!
//! Externally supplied identifiers (path parameters, CLI arguments) must already be canonical;
//! [`RecordId::parse`] rejects uppercase, hyphenated, wrong-length and non-hex input rather than
//! normalising it.
//!
//! Analyses are identified by an [`AnalysisId`], a time-prefixed identifier of the form
//! `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>` so that identifiers sort by creation time.

mod service;

pub use service::{AnalysisId, RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
