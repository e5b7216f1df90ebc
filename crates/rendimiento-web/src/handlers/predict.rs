//! The prediction form — one page, eight readings, one result.

use axum::{extract::State, response::Html, Form};
use tracing::info;

use crate::render::RenderError;
use crate::state::SharedState;

pub async fn form_page(State(state): State<SharedState>) -> Result<Html<String>, RenderError> {
    let snapshot = state.controller.snapshot().await;
    state.templates.index(&snapshot)
}

/// Browser form post. Validation failures are shown inline, so the page is
/// rendered the same way whatever the outcome.
pub async fn form_submit(
    State(state): State<SharedState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Html<String>, RenderError> {
    match state.submit_fields(fields).await {
        Ok(outcome) => info!(seq = outcome.seq(), "Form submission handled"),
        Err(e) => info!("Form submission rejected: {e}"),
    }
    let snapshot = state.controller.snapshot().await;
    state.templates.index(&snapshot)
}
