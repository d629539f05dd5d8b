use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, cors_layer, router, serve};
use medcase_core::config::{catalog_from_env_value, flag_from_env_value};
use medcase_core::{CoreConfig, seed::seed_demo};

/// Main entry point for the medcase service
///
/// Resolves configuration once, builds the in-memory services and serves the REST API.
///
/// # Environment Variables
/// - `MEDCASE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `MEDCASE_CATALOG_PATH`: YAML disease catalog replacing the built-in one
/// - `MEDCASE_SEED_DEMO`: seed demo accounts and a demo case when truthy
/// - `API_KEY`: required `x-api-key` value for everything but health
/// - `MEDCASE_CORS_ORIGINS`: comma-separated allowed origins (default: permissive)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medcase=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDCASE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let catalog = catalog_from_env_value(std::env::var("MEDCASE_CATALOG_PATH").ok())?;
    let config = CoreConfig::new(
        catalog,
        flag_from_env_value(std::env::var("MEDCASE_SEED_DEMO").ok()),
    )?;
    let origins: Vec<String> = std::env::var("MEDCASE_CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    tracing::info!(
        "++ Loaded disease catalog with {} patterns",
        config.catalog().len()
    );

    let state = AppState::in_memory(&config).with_api_key(std::env::var("API_KEY").ok());

    if config.seed_demo() {
        seed_demo(&state.accounts, &state.cases)?;
    }

    let app = router(state, cors_layer(&origins)?);
    serve(&rest_addr, app).await
}
