mod address;
mod branches;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use revkz_geocode::{AddressVerifier, VerifyError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<AddressVerifier>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Failure body of the validation endpoints: `{ok: false, error, code}`.
#[derive(Debug, Serialize)]
pub struct ValidationFailure {
    ok: bool,
    pub error: String,
    pub code: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ValidationFailure {
    pub fn new(status: StatusCode, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code: code.into(),
            status,
        }
    }

    pub(super) fn from_rejection(request_id: &str, rejection: &JsonRejection) -> Self {
        tracing::debug!(request_id, error = %rejection, "rejected request body");
        Self::new(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "request body must be a JSON object",
        )
    }
}

impl From<VerifyError> for ValidationFailure {
    fn from(err: VerifyError) -> Self {
        Self::new(verify_error_status(&err), err.code(), err.to_string())
    }
}

impl IntoResponse for ValidationFailure {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Every verification failure is a 4xx: the caller either fixes the input or
/// retries later.
pub(super) fn verify_error_status(err: &VerifyError) -> StatusCode {
    match err {
        VerifyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        VerifyError::AddressNotVerifiable => StatusCode::UNPROCESSABLE_ENTITY,
        VerifyError::InvalidCity { .. }
        | VerifyError::AddressTooShort
        | VerifyError::HouseNumberMissing
        | VerifyError::Forbidden
        | VerifyError::ServiceUnavailable
        | VerifyError::Timeout => StatusCode::BAD_REQUEST,
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    cities: usize,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn verification_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/address/validate", post(address::validate_address))
        .route("/api/v1/branches/validate", post(branches::validate_branch))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/cities", get(list_cities));

    Router::new()
        .merge(public_routes)
        .merge(verification_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            cities: state.verifier.cities().len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn list_cities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse {
        data: state.verifier.cities().names().to_vec(),
        meta: ResponseMeta::new(req_id.0),
    })
}
