//! Page rendering with minijinja. Operator input is echoed back into the
//! page, so templates are always auto-escaped.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::{context, AutoEscape, Environment};
use rendimiento_client::FormSnapshot;
use tracing::error;

const INDEX_TEMPLATE: &str = "index.html";

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn index(&self, snapshot: &FormSnapshot) -> Result<Html<String>, RenderError> {
        let updated_at = snapshot
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        // minijinja prints whole floats as "1250.0"; Display gives "1250".
        let prediction = snapshot
            .result
            .as_ref()
            .map(|r| r.predicted_rendimiento_t_h.to_string());
        let html = self.env.get_template(INDEX_TEMPLATE)?.render(context! {
            fields     => &snapshot.fields,
            result     => &snapshot.result,
            prediction => prediction,
            error      => &snapshot.error,
            submitting => snapshot.submitting,
            updated_at => updated_at,
        })?;
        Ok(Html(html))
    }
}

/// A template failed to render.
#[derive(Debug)]
pub struct RenderError(minijinja::Error);

impl From<minijinja::Error> for RenderError {
    fn from(e: minijinja::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("Template rendering failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
    }
}
