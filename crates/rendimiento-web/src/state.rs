//! Shared application state for the web server.

use std::sync::Arc;
use rendimiento_client::{FormController, PredictionBackend, PredictionClient, SubmitOutcome};
use rendimiento_common::Result;
use rendimiento_config::Config;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::render::Templates;

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// The service returned a prediction
    PredictionReady { seq: u64, predicted_rendimiento_t_h: f64, model_used: String },
    /// The service call failed
    PredictionFailed { seq: u64, message: String },
    /// Validation blocked the submission before any request was made
    SubmissionRejected { fields: Vec<String> },
    /// A newer submission superseded this one
    SubmissionDiscarded { seq: u64 },
    /// The form was cleared
    FormReset,
}

impl AppEvent {
    fn from_outcome(outcome: &SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Predicted { seq, output } => AppEvent::PredictionReady {
                seq: *seq,
                predicted_rendimiento_t_h: output.predicted_rendimiento_t_h,
                model_used: output.model_used.clone(),
            },
            SubmitOutcome::Failed { seq, message } => AppEvent::PredictionFailed {
                seq: *seq,
                message: message.clone(),
            },
            SubmitOutcome::Stale { seq } => AppEvent::SubmissionDiscarded { seq: *seq },
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub controller: FormController,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
    pub templates: Templates,
}

impl AppState {
    /// State backed by the HTTP client for the configured gateway.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = PredictionClient::new(&config.endpoint)?;
        Self::with_backend(Arc::new(client))
    }

    pub fn with_backend(backend: Arc<dyn PredictionBackend>) -> anyhow::Result<Self> {
        let (event_tx, _) = broadcast::channel(256);
        Ok(Self {
            controller: FormController::new(backend),
            event_tx,
            templates: Templates::new()?,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Send to every subscriber; having none is fine.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Copy submitted key/value pairs into the form, then submit it.
    ///
    /// Unknown keys are skipped. Every outcome, rejection included, is
    /// published as an event.
    pub async fn submit_fields<I, K, V>(&self, fields: I) -> Result<SubmitOutcome>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in fields {
            let key = key.as_ref();
            if self.controller.set_field(key, value).await.is_err() {
                warn!(field = %key, "Ignoring unknown form field");
            }
        }

        let outcome = self.controller.submit().await;
        match &outcome {
            Ok(outcome) => self.publish(AppEvent::from_outcome(outcome)),
            Err(err) => self.publish(AppEvent::SubmissionRejected {
                fields: err.field_errors().iter().map(|(f, _)| f.key().to_string()).collect(),
            }),
        }
        outcome
    }

    pub async fn reset(&self) {
        self.controller.reset().await;
        self.publish(AppEvent::FormReset);
    }
}

pub type SharedState = Arc<AppState>;
