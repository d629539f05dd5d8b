//! Storage interfaces for accounts and medical cases.
//!
//! Services receive repositories as `Arc<dyn …>` so the HTTP layer, the CLI and the tests can
//! share one store or swap in another backend. The scoring pipeline never touches them.

use crate::accounts::Account;
use crate::cases::MedicalCase;
use crate::error::CoreResult;
use medcase_types::EmailAddress;
use medcase_uuid::RecordId;

pub mod memory;

pub use memory::{InMemoryAccountRepository, InMemoryCaseRepository};

pub trait AccountRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::EmailAlreadyRegistered`] if the email is taken.
    fn create(&self, account: Account) -> CoreResult<Account>;

    fn get(&self, id: RecordId) -> CoreResult<Option<Account>>;

    fn find_by_email(&self, email: &EmailAddress) -> CoreResult<Option<Account>>;

    fn count(&self) -> CoreResult<usize>;
}

pub trait CaseRepository: Send + Sync {
    fn create(&self, case: MedicalCase) -> CoreResult<MedicalCase>;

    fn get(&self, id: RecordId) -> CoreResult<Option<MedicalCase>>;

    /// Returns every stored case, in no particular order.
    fn list(&self) -> CoreResult<Vec<MedicalCase>>;

    /// Applies `apply` to the stored case and keeps the result, as one step.
    ///
    /// No other write to the case can land between `apply` seeing the case and the change being
    /// stored. If `apply` fails the stored case is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::CaseNotFound`] if no case has this id, or the error from
    /// `apply`.
    fn update_with(
        &self,
        id: RecordId,
        apply: &mut dyn FnMut(&mut MedicalCase) -> CoreResult<()>,
    ) -> CoreResult<MedicalCase>;
}
