use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use revkz_core::normalize_kz_phone;
use serde::{Deserialize, Serialize};

use super::{AppState, ValidationFailure};
use crate::middleware::RequestId;

/// Branch details as submitted by the owner before the branch is saved.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct BranchDraft {
    city: String,
    address: String,
    phone: String,
}

/// Canonical branch fields ready to be persisted.
#[derive(Debug, Serialize)]
pub(super) struct BranchValidated {
    ok: bool,
    city: String,
    phone: String,
    lat: f64,
    lng: f64,
}

/// Checks run in the order a form would show them: city, phone, then the
/// address lookup, so no geocoder call is spent on a draft with a bad phone.
pub(super) async fn validate_branch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<BranchDraft>, JsonRejection>,
) -> Result<Json<BranchValidated>, ValidationFailure> {
    let Json(draft) =
        payload.map_err(|rejection| ValidationFailure::from_rejection(&req_id.0, &rejection))?;

    let city = state.verifier.validate_city(&draft.city)?;
    let phone = normalize_kz_phone(&draft.phone).map_err(|err| {
        ValidationFailure::new(StatusCode::BAD_REQUEST, "invalid_phone", format!("phone: {err}"))
    })?;

    let result = state
        .verifier
        .verify(&city, &draft.address)
        .await
        .inspect_err(|err| {
            tracing::info!(request_id = %req_id.0, code = err.code(), "branch address rejected");
        })?;

    Ok(Json(BranchValidated {
        ok: true,
        city,
        phone,
        lat: result.lat,
        lng: result.lng,
    }))
}
