//! # API REST
//!
//! REST API implementation for medcase.
//!
//! Handles:
//! - HTTP endpoints with axum, versioned under `/api/v1`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API key check)
//!
//! Uses `api-shared` for wire types and `medcase-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod v1;

use api_shared::auth::validate_api_key;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use medcase_core::repositories::{InMemoryAccountRepository, InMemoryCaseRepository};
use medcase_core::{AccountService, Analyzer, CaseService, CoreConfig};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server.
///
/// Services are cheap to clone; they share their repositories through `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub accounts: AccountService,
    pub cases: CaseService,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, accounts: AccountService, cases: CaseService) -> Self {
        Self {
            analyzer,
            accounts,
            cases,
            api_key: None,
        }
    }

    /// Builds services over fresh in-memory repositories.
    pub fn in_memory(config: &CoreConfig) -> Self {
        let analyzer = Analyzer::new(config.catalog());
        let accounts = AccountService::new(Arc::new(InMemoryAccountRepository::new()));
        let cases = CaseService::new(
            Arc::new(InMemoryCaseRepository::new()),
            accounts.clone(),
            analyzer.clone(),
        );
        Self::new(analyzer, accounts, cases)
    }

    /// Requires `x-api-key` on every route except health. Empty keys are ignored.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Arc::from);
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        v1::health,
        v1::register,
        v1::login,
        v1::analyze,
        v1::catalog,
        v1::submit_case,
        v1::list_cases,
        v1::get_case,
        v1::start_review,
        v1::review_case,
        v1::doctor_cases,
        v1::stats,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::SymptomAnalysisReq,
        api_shared::AnalysisRes,
        api_shared::PatientInfoRes,
        api_shared::SymptomsAnalyzedRes,
        api_shared::DiseasePredictionRes,
        api_shared::RiskAssessmentRes,
        api_shared::RecommendationsRes,
        api_shared::CatalogRes,
        api_shared::DiseasePatternRes,
        api_shared::RegisterReq,
        api_shared::LoginReq,
        api_shared::AccountRes,
        api_shared::SubmitCaseReq,
        api_shared::CaseSymptomsDto,
        api_shared::AiAssessmentRes,
        api_shared::PrescriptionDto,
        api_shared::CaseRes,
        api_shared::ListCasesRes,
        api_shared::StartReviewReq,
        api_shared::ReviewCaseReq,
        api_shared::StatsRes,
    ))
)]
pub struct ApiDoc;

/// Builds a CORS layer. No origins means permissive.
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = req
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());

        if let Err(e) = validate_api_key(provided, expected) {
            tracing::warn!("Rejected request to {}: {}", req.uri().path(), e);
            return Err((StatusCode::UNAUTHORIZED, "Invalid or missing API key"));
        }
    }
    Ok(next.run(req).await)
}

/// Builds the full application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let protected = Router::new()
        .route("/auth/register", post(v1::register))
        .route("/auth/login", post(v1::login))
        .route("/ai/analyze", post(v1::analyze))
        .route("/ai/catalog", get(v1::catalog))
        .route("/cases", post(v1::submit_case).get(v1::list_cases))
        .route("/cases/:id", get(v1::get_case))
        .route("/cases/:id/start-review", post(v1::start_review))
        .route("/cases/:id/review", post(v1::review_case))
        .route("/doctor/cases", get(v1::doctor_cases))
        .route("/stats", get(v1::stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(v1::health))
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves `app` until the process stops.
pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ Medcase REST listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use medcase_core::{Account, Role};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        patient: Account,
        doctor: Account,
    }

    impl TestApp {
        fn new(api_key: Option<&str>) -> Self {
            let state =
                AppState::in_memory(&CoreConfig::default()).with_api_key(api_key.map(String::from));
            let patient = state
                .accounts
                .create_account("p@example.com", "patient123", Role::Patient, "Pat", "Ient")
                .unwrap();
            let doctor = state
                .accounts
                .create_account("d@example.com", "doctor123", Role::Doctor, "Doc", "Tor")
                .unwrap();
            Self {
                state,
                patient,
                doctor,
            }
        }

        async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            self.send_with_key(method, uri, body, None).await
        }

        async fn send_with_key(
            &self,
            method: &str,
            uri: &str,
            body: Option<Value>,
            key: Option<&str>,
        ) -> (StatusCode, Value) {
            let app = router(self.state.clone(), CorsLayer::permissive());
            let mut builder = axum::http::Request::builder().method(method).uri(uri);
            if let Some(key) = key {
                builder = builder.header("x-api-key", key);
            }
            let req = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = app.oneshot(req).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    }

    fn case_body(patient_id: &str) -> Value {
        json!({
            "patient_id": patient_id,
            "symptoms": {
                "description": "Fever and a dry cough",
                "duration_hours": 48,
                "severity": 6,
                "has_fever": true,
                "has_cough": true,
                "has_fatigue": true,
            },
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(Some("secret"));
        let (status, body) = app.send("GET", "/api/v1/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_api_key_required_when_configured() {
        let app = TestApp::new(Some("secret"));

        let (status, _) = app.send("GET", "/api/v1/ai/catalog", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send_with_key("GET", "/api/v1/ai/catalog", None, Some("wrong"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .send_with_key("GET", "/api/v1/ai/catalog", None, Some("secret"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patterns"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_analyze() {
        let app = TestApp::new(None);
        let (status, body) = app
            .send(
                "POST",
                "/api/v1/ai/analyze",
                Some(json!({
                    "age": 30,
                    "symptoms": {"fever": true, "cough": true, "fatigue": true},
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["disease_predictions"][0]["disease"], "COVID-19");
        assert_eq!(body["disease_predictions"][0]["confidence"], 36.0);
        assert_eq!(body["confidence_score"], 0.29);
        assert_eq!(body["risk_assessment"]["urgency_level"], "low");
        assert_eq!(body["ai_version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_analyze_rejects_out_of_range_age() {
        let app = TestApp::new(None);
        let (status, _) = app
            .send("POST", "/api/v1/ai/analyze", Some(json!({"age": 130})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = TestApp::new(None);
        let form = json!({
            "email": "new@example.com",
            "password": "hunter22",
            "first_name": "New",
            "last_name": "Patient",
            "agree_to_terms": true,
            "acknowledge_educational": true,
        });

        let (status, body) = app.send("POST", "/api/v1/auth/register", Some(form.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "patient");

        let (status, _) = app.send("POST", "/api/v1/auth/register", Some(form)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/auth/login",
                Some(json!({"email": "new@example.com", "password": "hunter22"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "New Patient");

        let (status, _) = app
            .send(
                "POST",
                "/api/v1/auth/login",
                Some(json!({"email": "new@example.com", "password": "nope"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_case_review_flow() {
        let app = TestApp::new(None);
        let patient_id = app.patient.id.to_string();
        let doctor_id = app.doctor.id.to_string();

        let (status, case) = app
            .send("POST", "/api/v1/cases", Some(case_body(&patient_id)))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(case["status"], "pending_review");
        assert_eq!(case["ai_assessment"]["possible_conditions"][0], "COVID-19");
        let case_id = case["id"].as_str().unwrap().to_string();

        let (status, queue) = app.send("GET", "/api/v1/doctor/cases", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(queue["cases"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(
                "POST",
                &format!("/api/v1/cases/{case_id}/start-review"),
                Some(json!({"doctor_id": patient_id})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, started) = app
            .send(
                "POST",
                &format!("/api/v1/cases/{case_id}/start-review"),
                Some(json!({"doctor_id": doctor_id})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["status"], "in_review");

        let (status, reviewed) = app
            .send(
                "POST",
                &format!("/api/v1/cases/{case_id}/review"),
                Some(json!({
                    "doctor_id": doctor_id,
                    "doctor_diagnosis": "Viral upper respiratory infection",
                    "follow_up_required": true,
                    "follow_up_days": 7,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reviewed["status"], "completed");

        let (status, _) = app
            .send(
                "POST",
                &format!("/api/v1/cases/{case_id}/review"),
                Some(json!({"doctor_id": doctor_id, "doctor_diagnosis": "Again"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, listed) = app
            .send(
                "GET",
                &format!("/api/v1/cases?patient_id={patient_id}&status=completed"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["cases"][0]["id"], case_id.as_str());

        let (status, stats) = app.send("GET", "/api/v1/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_cases"], 1);
        assert_eq!(stats["completed"], 1);
        assert_eq!(stats["total_users"], 2);
    }

    #[tokio::test]
    async fn test_case_lookup_errors() {
        let app = TestApp::new(None);

        let (status, _) = app.send("GET", "/api/v1/cases/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = medcase_core::RecordId::new();
        let (status, _) = app
            .send("GET", &format!("/api/v1/cases/{missing}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send("GET", "/api/v1/cases?status=closed", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let app = TestApp::new(Some("secret"));
        let (status, body) = app.send("GET", "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/api/v1/ai/analyze").is_some());
    }

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["http://localhost:3000".into()]).is_ok());
        assert!(cors_layer(&["bad\norigin".into()]).is_err());
    }
}
