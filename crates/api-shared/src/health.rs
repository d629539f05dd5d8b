use crate::dto::HealthRes;

/// Simple health service shared by the API front-ends.
pub struct HealthService;

impl HealthService {
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Medcase is alive".into(),
            ai_version: medcase_core::constants::AI_VERSION.into(),
        }
    }
}
