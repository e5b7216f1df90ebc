//! Form controller: holds what the operator typed and what the last
//! submission produced.
//!
//! Submissions may overlap. Each accepted submission gets a sequence number
//! and only the most recently issued one may change the displayed outcome;
//! anything that completes after a newer submission was issued is dropped.

use chrono::{DateTime, Utc};
use rendimiento_common::{Feature, FieldError, FormState, PredictionOutput, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::PredictionBackend;

/// What happened to an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Predicted { seq: u64, output: PredictionOutput },
    Failed { seq: u64, message: String },
    /// A newer submission was issued before this one completed.
    Stale { seq: u64 },
}

impl SubmitOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            SubmitOutcome::Predicted { seq, .. }
            | SubmitOutcome::Failed { seq, .. }
            | SubmitOutcome::Stale { seq } => *seq,
        }
    }
}

/// One input as the page renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub label: String,
    pub value: String,
    pub error: Option<String>,
}

/// Everything needed to draw the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub fields: Vec<FieldView>,
    pub result: Option<PredictionOutput>,
    pub error: Option<String>,
    pub submitting: bool,
    /// Sequence number of the submission whose outcome is displayed.
    pub sequence: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct ControllerState {
    form: FormState,
    field_errors: Vec<(Feature, FieldError)>,
    result: Option<PredictionOutput>,
    error: Option<String>,
    issued: u64,
    applied: u64,
    updated_at: Option<DateTime<Utc>>,
}

pub struct FormController {
    backend: Arc<dyn PredictionBackend>,
    state: Mutex<ControllerState>,
    /// Requests awaiting the backend. Kept outside the lock so a dropped
    /// submission can release its slot without awaiting.
    in_flight: AtomicUsize,
}

/// Holds one `in_flight` slot until dropped, including when the submitting
/// future is cancelled mid-request.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FormController {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(ControllerState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Record `raw` under `name` exactly as typed.
    pub async fn set_field(&self, name: &str, raw: impl Into<String>) -> Result<Feature> {
        self.state.lock().await.form.set_by_key(name, raw)
    }

    /// Validate, send, and record the outcome.
    ///
    /// Returns `Err(Validation)` without touching the network when any field
    /// is empty or not a number; the failing fields are kept for display.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (seq, input, in_flight) = {
            let mut st = self.state.lock().await;
            let input = match st.form.parse() {
                Ok(input) => input,
                Err(err) => {
                    st.field_errors = err.field_errors().to_vec();
                    debug!(failing = st.field_errors.len(), "Submission rejected by validation");
                    return Err(err);
                }
            };
            st.field_errors.clear();
            st.result = None;
            st.error = None;
            st.issued += 1;
            (st.issued, input, InFlight::enter(&self.in_flight))
        };

        info!(seq, backend = self.backend.name(), "Submitting prediction request");
        let response = self.backend.predict(&input).await;

        let mut st = self.state.lock().await;
        drop(in_flight);

        if seq != st.issued {
            debug!(seq, latest = st.issued, "Discarding stale prediction response");
            return Ok(SubmitOutcome::Stale { seq });
        }

        st.applied = seq;
        st.updated_at = Some(Utc::now());
        let outcome = match response {
            Ok(output) => {
                st.result = Some(output.clone());
                SubmitOutcome::Predicted { seq, output }
            }
            Err(err) => {
                let message = err.to_string();
                warn!(seq, error = %message, "Prediction failed");
                st.error = Some(message.clone());
                SubmitOutcome::Failed { seq, message }
            }
        };
        Ok(outcome)
    }

    /// Empty the form and forget the last outcome.
    ///
    /// Submissions still in flight become stale.
    pub async fn reset(&self) {
        let mut st = self.state.lock().await;
        st.form.clear();
        st.field_errors.clear();
        st.result = None;
        st.error = None;
        st.updated_at = None;
        // Bumping the counter orphans in-flight requests.
        st.issued += 1;
        st.applied = st.issued;
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let st = self.state.lock().await;
        let fields = st
            .form
            .iter()
            .map(|(feature, value)| FieldView {
                key: feature.key(),
                label: feature.label(),
                value: value.to_string(),
                error: st
                    .field_errors
                    .iter()
                    .find(|(f, _)| *f == feature)
                    .map(|(_, e)| e.to_string()),
            })
            .collect();

        FormSnapshot {
            fields,
            result: st.result.clone(),
            error: st.error.clone(),
            submitting: self.in_flight.load(Ordering::SeqCst) > 0,
            sequence: st.applied,
            updated_at: st.updated_at,
        }
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}
