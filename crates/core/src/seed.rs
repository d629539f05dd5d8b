//! Demo data for local runs.

use crate::accounts::{AccountService, Role};
use crate::cases::{CaseService, CaseSymptoms};
use crate::error::{CoreError, CoreResult};

const DEMO_ACCOUNTS: &[(&str, &str, Role, &str, &str)] = &[
    ("patient.demo@medical.com", "patient123", Role::Patient, "Demo", "Patient"),
    ("john.doe@example.com", "password123", Role::Patient, "John", "Doe"),
    ("dr.smith@medical.com", "doctor123", Role::Doctor, "Sarah", "Smith"),
    ("dr.jones@medical.com", "neurology123", Role::Doctor, "Michael", "Jones"),
    ("admin@medical.com", "admin123", Role::Admin, "System", "Admin"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts: usize,
    pub cases: usize,
}

/// Creates the demo accounts and one pending case for the demo patient.
///
/// Accounts that already exist are left alone, so seeding twice is harmless.
pub fn seed_demo(accounts: &AccountService, cases: &CaseService) -> CoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut demo_patient = None;

    for (email, password, role, first, last) in DEMO_ACCOUNTS {
        match accounts.create_account(email, password, *role, first, last) {
            Ok(account) => {
                summary.accounts += 1;
                if demo_patient.is_none() && *role == Role::Patient {
                    demo_patient = Some(account.id);
                }
            }
            Err(CoreError::EmailAlreadyRegistered) => {
                tracing::debug!("demo account {} already exists", email);
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(patient_id) = demo_patient {
        cases.submit(
            patient_id,
            CaseSymptoms {
                description: "Severe headache with sensitivity to light, feeling queasy".into(),
                duration_hours: 72,
                severity: 7,
                temperature: Some(37.2),
                has_fever: false,
                has_cough: false,
                has_headache: true,
                has_nausea: true,
                has_fatigue: false,
                additional_notes: Some("Worse in the mornings".into()),
            },
        )?;
        summary.cases += 1;
    }

    tracing::info!(
        "seeded {} demo accounts and {} demo cases",
        summary.accounts,
        summary.cases
    );
    Ok(summary)
}
