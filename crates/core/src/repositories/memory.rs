//! In-memory repositories backed by `RwLock<HashMap<…>>`.

use super::{AccountRepository, CaseRepository};
use crate::accounts::Account;
use crate::cases::MedicalCase;
use crate::error::{CoreError, CoreResult};
use medcase_types::EmailAddress;
use medcase_uuid::RecordId;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<RecordId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn create(&self, account: Account) -> CoreResult<Account> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| CoreError::RepositoryPoisoned)?;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(CoreError::EmailAlreadyRegistered);
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn get(&self, id: RecordId) -> CoreResult<Option<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| CoreError::RepositoryPoisoned)?;
        Ok(accounts.get(&id).cloned())
    }

    fn find_by_email(&self, email: &EmailAddress) -> CoreResult<Option<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| CoreError::RepositoryPoisoned)?;
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }

    fn count(&self) -> CoreResult<usize> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| CoreError::RepositoryPoisoned)?;
        Ok(accounts.len())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCaseRepository {
    cases: RwLock<HashMap<RecordId, MedicalCase>>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn create(&self, case: MedicalCase) -> CoreResult<MedicalCase> {
        let mut cases = self
            .cases
            .write()
            .map_err(|_| CoreError::RepositoryPoisoned)?;
        cases.insert(case.id, case.clone());
        Ok(case)
    }

    fn get(&self, id: RecordId) -> CoreResult<Option<MedicalCase>> {
        let cases = self.cases.read().map_err(|_| CoreError::RepositoryPoisoned)?;
        Ok(cases.get(&id).cloned())
    }

    fn list(&self) -> CoreResult<Vec<MedicalCase>> {
        let cases = self.cases.read().map_err(|_| CoreError::RepositoryPoisoned)?;
        Ok(cases.values().cloned().collect())
    }

    fn update_with(
        &self,
        id: RecordId,
        apply: &mut dyn FnMut(&mut MedicalCase) -> CoreResult<()>,
    ) -> CoreResult<MedicalCase> {
        let mut cases = self
            .cases
            .write()
            .map_err(|_| CoreError::RepositoryPoisoned)?;

        let slot = cases.get_mut(&id).ok_or(CoreError::CaseNotFound(id))?;
        let mut next = slot.clone();
        apply(&mut next)?;
        *slot = next.clone();
        Ok(next)
    }
}
