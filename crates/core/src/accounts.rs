//! Accounts for patients, doctors and administrators.

use crate::error::{CoreError, CoreResult};
use crate::repositories::AccountRepository;
use chrono::{DateTime, Utc};
use medcase_types::{EmailAddress, NonEmptyText};
use medcase_uuid::RecordId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: RecordId,
    pub email: EmailAddress,
    pub role: Role,
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// SHA-256 of the password, lowercase hex.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Self-service patient sign-up form.
#[derive(Clone, Debug, Deserialize)]
pub struct PatientRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub agree_to_terms: bool,
    #[serde(default)]
    pub acknowledge_educational: bool,
}

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Registers a patient account.
    ///
    /// # Errors
    ///
    /// - [`CoreError::TermsNotAccepted`] unless both acknowledgements are set.
    /// - [`CoreError::Text`] for an empty name or malformed email.
    /// - [`CoreError::EmailAlreadyRegistered`] if the email is taken.
    pub fn register_patient(&self, registration: PatientRegistration) -> CoreResult<Account> {
        if !registration.agree_to_terms || !registration.acknowledge_educational {
            return Err(CoreError::TermsNotAccepted);
        }

        let account = self.create_account(
            &registration.email,
            &registration.password,
            Role::Patient,
            &registration.first_name,
            &registration.last_name,
        )?;
        tracing::info!(account_id = %account.id, "registered patient account");
        Ok(account)
    }

    /// Creates an account of any role. Used for registration and demo seeding.
    pub fn create_account(
        &self,
        email: &str,
        password: &str,
        role: Role,
        first_name: &str,
        last_name: &str,
    ) -> CoreResult<Account> {
        let email = EmailAddress::parse(email)?;
        if password.trim().is_empty() {
            return Err(CoreError::InvalidInput("password cannot be empty".into()));
        }

        let account = Account {
            id: RecordId::new(),
            email,
            role,
            first_name: NonEmptyText::new(first_name)?,
            last_name: NonEmptyText::new(last_name)?,
            is_active: true,
            created_at: Utc::now(),
            password_hash: hash_password(password.trim()),
        };
        self.repo.create(account)
    }

    /// Checks a password and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCredentials`] for an unknown email, an inactive account or a
    /// wrong password alike.
    pub fn login(&self, email: &str, password: &str) -> CoreResult<Account> {
        let email = EmailAddress::parse(email).map_err(|_| CoreError::InvalidCredentials)?;
        let account = self
            .repo
            .find_by_email(&email)?
            .ok_or(CoreError::InvalidCredentials)?;

        if !account.is_active || account.password_hash != hash_password(password.trim()) {
            return Err(CoreError::InvalidCredentials);
        }
        Ok(account)
    }

    pub fn get(&self, id: RecordId) -> CoreResult<Account> {
        self.repo.get(id)?.ok_or(CoreError::AccountNotFound(id))
    }

    /// Fetches an account and checks it may review cases.
    pub fn require_doctor(&self, id: RecordId) -> CoreResult<Account> {
        let account = self.get(id)?;
        match account.role {
            Role::Doctor | Role::Admin => Ok(account),
            Role::Patient => Err(CoreError::NotADoctor(id)),
        }
    }

    pub fn count(&self) -> CoreResult<usize> {
        self.repo.count()
    }
}
