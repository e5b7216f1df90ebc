//! HTTP client for the throughput prediction gateway.
//!
//! One POST per prediction, JSON in and JSON out. Non-success responses are
//! mined for an `error`/`message` field before falling back to a generic
//! message, so gateway validation errors reach the operator.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use rendimiento_common::error::GENERIC_FAILURE;
use rendimiento_common::{ErrorBody, PredictionInput, PredictionOutput, RendimientoError, Result};
use rendimiento_config::EndpointConfig;
use tracing::{debug, info, instrument, warn};

use crate::backend::PredictionBackend;

const USER_AGENT: &str = concat!("Rendimiento/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    url: String,
}

impl PredictionClient {
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RendimientoError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, config.url.clone()))
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PredictionBackend for PredictionClient {
    fn name(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self, input), fields(url = %self.url))]
    async fn predict(&self, input: &PredictionInput) -> Result<PredictionOutput> {
        debug!(?input, "Sending prediction request");

        let resp = self.http.post(&self.url).json(input).send().await?;
        let status = resp.status();

        if !status.is_success() {
            // An unreadable body still yields the generic message.
            let body = resp.bytes().await.unwrap_or_default();
            let message = failure_message(&body);
            warn!(status = status.as_u16(), %message, "Prediction service returned an error");
            return Err(RendimientoError::Status { status: status.as_u16(), message });
        }

        let body = resp.bytes().await?;
        let output: PredictionOutput = serde_json::from_slice(&body)?;
        info!(
            predicted = output.predicted_rendimiento_t_h,
            model = %output.model_used,
            "Prediction received"
        );
        Ok(output)
    }
}

/// Server-provided reason if the body carries one, else the generic message.
fn failure_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
