//! Version 1 handlers, mounted under `/api/v1`.

use crate::AppState;
use api_shared::{
    AccountRes, AnalysisRes, CaseRes, CatalogRes, HealthRes, HealthService, ListCasesQuery,
    ListCasesRes, LoginReq, RegisterReq, ReviewCaseReq, StartReviewReq, StatsRes, SubmitCaseReq,
    SymptomAnalysisReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use medcase_core::{CaseFilter, CaseStatus, CoreError, RecordId};

pub(crate) type ApiError = (StatusCode, &'static str);

/// Maps a core error to a status and a fixed message. Details go to the log only.
fn status_for(err: &CoreError) -> ApiError {
    match err {
        CoreError::InvalidInput(_) | CoreError::Text(_) => {
            (StatusCode::BAD_REQUEST, "Invalid request")
        }
        CoreError::Identifier(_) => (StatusCode::BAD_REQUEST, "Invalid identifier"),
        CoreError::TermsNotAccepted => (
            StatusCode::BAD_REQUEST,
            "Terms and educational acknowledgement must be accepted",
        ),
        CoreError::EmailAlreadyRegistered => (StatusCode::CONFLICT, "Email already registered"),
        CoreError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
        CoreError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "Account not found"),
        CoreError::NotADoctor(_) => (StatusCode::FORBIDDEN, "Doctor account required"),
        CoreError::CaseNotFound(_) => (StatusCode::NOT_FOUND, "Case not found"),
        CoreError::InvalidCaseTransition { .. } => {
            (StatusCode::CONFLICT, "Case is not in a state that allows this")
        }
        CoreError::Analysis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AI analysis failed"),
        CoreError::CatalogRead(_)
        | CoreError::CatalogParse { .. }
        | CoreError::InvalidCatalog(_)
        | CoreError::RepositoryPoisoned => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

fn reject(context: &str, err: CoreError) -> ApiError {
    let status = status_for(&err);
    if status.0.is_server_error() {
        tracing::error!("{} error: {:?}", context, err);
    } else {
        tracing::warn!("{} rejected: {}", context, err);
    }
    status
}

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw).map_err(|e| {
        tracing::warn!("Invalid identifier: {}", e);
        (StatusCode::BAD_REQUEST, "Invalid identifier")
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint. Never requires an API key.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Patient account created", body = AccountRes),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<AccountRes>), ApiError> {
    match state.accounts.register_patient(req.into()) {
        Ok(account) => Ok((StatusCode::CREATED, Json(account.into()))),
        Err(e) => Err(reject("Register", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Credentials accepted", body = AccountRes),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> Result<Json<AccountRes>, ApiError> {
    match state.accounts.login(&req.email, &req.password) {
        Ok(account) => {
            tracing::info!(account_id = %account.id, "login");
            Ok(Json(account.into()))
        }
        Err(e) => Err(reject("Login", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/ai/analyze",
    request_body = SymptomAnalysisReq,
    responses(
        (status = 200, description = "Symptom analysis", body = AnalysisRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "AI analysis failed")
    )
)]
/// Runs the full symptom analysis for one request.
///
/// The response is educational guidance only, not a diagnosis.
#[axum::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<SymptomAnalysisReq>,
) -> Result<Json<AnalysisRes>, ApiError> {
    let (payload, patient) = req.into_parts().map_err(|e| {
        tracing::warn!("Analyze rejected: {}", e);
        (StatusCode::BAD_REQUEST, "Invalid request")
    })?;

    match state.analyzer.analyze(&payload, &patient) {
        Ok(result) => Ok(Json(result.into())),
        Err(e) => Err(reject("Analyze", e.into())),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/ai/catalog",
    responses(
        (status = 200, description = "Disease patterns in tie-break order", body = CatalogRes)
    )
)]
#[axum::debug_handler]
pub async fn catalog(State(state): State<AppState>) -> Json<CatalogRes> {
    Json(state.analyzer.catalog().into())
}

#[utoipa::path(
    post,
    path = "/api/v1/cases",
    request_body = SubmitCaseReq,
    responses(
        (status = 201, description = "Case submitted", body = CaseRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_case(
    State(state): State<AppState>,
    Json(req): Json<SubmitCaseReq>,
) -> Result<(StatusCode, Json<CaseRes>), ApiError> {
    let patient_id = parse_id(&req.patient_id)?;
    match state.cases.submit(patient_id, req.symptoms.into()) {
        Ok(case) => Ok((StatusCode::CREATED, Json(case.into()))),
        Err(e) => Err(reject("Submit case", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cases",
    params(ListCasesQuery),
    responses(
        (status = 200, description = "Cases, newest first", body = ListCasesRes),
        (status = 400, description = "Bad request")
    )
)]
#[axum::debug_handler]
pub async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<ListCasesRes>, ApiError> {
    let patient_id = query.patient_id.as_deref().map(parse_id).transpose()?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CaseStatus>)
        .transpose()
        .map_err(|e| reject("List cases", e))?;

    match state.cases.list(&CaseFilter { patient_id, status }) {
        Ok(cases) => Ok(Json(cases.into_iter().collect())),
        Err(e) => Err(reject("List cases", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case", body = CaseRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Case not found")
    )
)]
#[axum::debug_handler]
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseRes>, ApiError> {
    let id = parse_id(&id)?;
    match state.cases.get(id) {
        Ok(case) => Ok(Json(case.into())),
        Err(e) => Err(reject("Get case", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cases/{id}/start-review",
    params(("id" = String, Path, description = "Case id")),
    request_body = StartReviewReq,
    responses(
        (status = 200, description = "Case assigned to the doctor", body = CaseRes),
        (status = 403, description = "Doctor account required"),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case is not pending")
    )
)]
#[axum::debug_handler]
pub async fn start_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StartReviewReq>,
) -> Result<Json<CaseRes>, ApiError> {
    let case_id = parse_id(&id)?;
    let doctor_id = parse_id(&req.doctor_id)?;
    match state.cases.start_review(case_id, doctor_id) {
        Ok(case) => Ok(Json(case.into())),
        Err(e) => Err(reject("Start review", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cases/{id}/review",
    params(("id" = String, Path, description = "Case id")),
    request_body = ReviewCaseReq,
    responses(
        (status = 200, description = "Case completed", body = CaseRes),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Doctor account required"),
        (status = 404, description = "Case not found"),
        (status = 409, description = "Case already completed")
    )
)]
#[axum::debug_handler]
pub async fn review_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewCaseReq>,
) -> Result<Json<CaseRes>, ApiError> {
    let case_id = parse_id(&id)?;
    let (doctor_id, review) = req.into_review();
    let doctor_id = parse_id(&doctor_id)?;
    match state.cases.review(case_id, doctor_id, review) {
        Ok(case) => Ok(Json(case.into())),
        Err(e) => Err(reject("Review case", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/doctor/cases",
    responses(
        (status = 200, description = "Open cases, pending first", body = ListCasesRes)
    )
)]
#[axum::debug_handler]
pub async fn doctor_cases(State(state): State<AppState>) -> Result<Json<ListCasesRes>, ApiError> {
    match state.cases.review_queue() {
        Ok(cases) => Ok(Json(cases.into_iter().collect())),
        Err(e) => Err(reject("Review queue", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Case and account counters", body = StatsRes)
    )
)]
#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsRes>, ApiError> {
    match state.cases.stats() {
        Ok(stats) => Ok(Json(stats.into())),
        Err(e) => Err(reject("Stats", e)),
    }
}
