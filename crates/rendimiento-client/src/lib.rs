//! rendimiento-client — Talks to the remote throughput prediction service.
//!
//! [`PredictionClient`] is the HTTP side; [`FormController`] owns the
//! operator's form and the outcome of the latest submission.

pub mod backend;
pub mod client;
pub mod controller;

pub use backend::PredictionBackend;
pub use client::PredictionClient;
pub use controller::{FieldView, FormController, FormSnapshot, SubmitOutcome};
