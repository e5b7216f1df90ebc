//! JSON API — the same form, driven by scripts instead of a browser.

use axum::{extract::State, http::StatusCode, Json};
use rendimiento_client::{FormSnapshot, SubmitOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// `predicted`, `failed`, `stale` or `rejected`
    pub status: &'static str,
    pub message: Option<String>,
    pub state: FormSnapshot,
}

pub async fn api_state(State(state): State<SharedState>) -> Json<FormSnapshot> {
    Json(state.controller.snapshot().await)
}

/// Body is a JSON object of field name to raw text, e.g. `{"ugm1": "0.3"}`.
pub async fn api_submit(
    State(state): State<SharedState>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> (StatusCode, Json<SubmitResponse>) {
    let (code, status, message) = match state.submit_fields(fields).await {
        Ok(SubmitOutcome::Predicted { .. }) => (StatusCode::OK, "predicted", None),
        Ok(SubmitOutcome::Failed { message, .. }) => (StatusCode::BAD_GATEWAY, "failed", Some(message)),
        Ok(SubmitOutcome::Stale { .. }) => (StatusCode::CONFLICT, "stale", None),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, "rejected", Some(e.to_string())),
    };
    let snapshot = state.controller.snapshot().await;
    (code, Json(SubmitResponse { status, message, state: snapshot }))
}

pub async fn api_reset(State(state): State<SharedState>) -> Json<FormSnapshot> {
    state.reset().await;
    Json(state.controller.snapshot().await)
}
