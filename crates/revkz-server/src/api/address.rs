use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use revkz_geocode::AddressQuery;
use serde::Serialize;

use super::{AppState, ValidationFailure};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct AddressVerified {
    ok: bool,
    lat: f64,
    lng: f64,
}

pub(super) async fn validate_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AddressQuery>, JsonRejection>,
) -> Result<Json<AddressVerified>, ValidationFailure> {
    let Json(query) =
        payload.map_err(|rejection| ValidationFailure::from_rejection(&req_id.0, &rejection))?;

    match state.verifier.verify(&query.city, &query.address).await {
        Ok(result) => Ok(Json(AddressVerified {
            ok: true,
            lat: result.lat,
            lng: result.lng,
        })),
        Err(err) => {
            tracing::info!(
                request_id = %req_id.0,
                code = err.code(),
                transient = err.is_transient(),
                user_correctable = err.is_user_correctable(),
                "address rejected"
            );
            Err(ValidationFailure::from(err))
        }
    }
}
