//! # API Shared
//!
//! Shared utilities and definitions for the medcase APIs.
//!
//! Contains:
//! - Wire request/response types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Authentication utilities (usable by the REST server and the CLI)

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
