//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables are read by the binaries only; the helpers
//! here take the raw values so they stay testable.

use crate::catalog::DiseaseCatalog;
use crate::error::{CoreError, CoreResult};
use std::path::Path;
use std::sync::Arc;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    catalog: Arc<DiseaseCatalog>,
    seed_demo: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            catalog: DiseaseCatalog::builtin(),
            seed_demo: false,
        }
    }
}

impl CoreConfig {
    pub fn new(catalog: Arc<DiseaseCatalog>, seed_demo: bool) -> CoreResult<Self> {
        if catalog.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "catalog must contain at least one pattern".into(),
            ));
        }
        Ok(Self { catalog, seed_demo })
    }

    pub fn catalog(&self) -> Arc<DiseaseCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn seed_demo(&self) -> bool {
        self.seed_demo
    }
}

/// Resolve the disease catalog from an optional file path value.
///
/// If `value` is `None` or empty/whitespace, returns the built-in catalog.
pub fn catalog_from_env_value(value: Option<String>) -> CoreResult<Arc<DiseaseCatalog>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(path) => Ok(Arc::new(DiseaseCatalog::from_yaml_file(Path::new(&path))?)),
        None => Ok(DiseaseCatalog::builtin()),
    }
}

/// Parse a boolean switch. Accepts `1`, `true`, `yes` and `on` in any case; anything else,
/// including an unset variable, is `false`.
pub fn flag_from_env_value(value: Option<String>) -> bool {
    value
        .map(|v| v.trim().to_ascii_lowercase())
        .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes" | "on"))
}
