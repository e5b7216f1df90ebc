use thiserror::Error;

use crate::features::Feature;
use crate::form::FieldError;

/// Shown when the prediction service rejects a request without a usable reason.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum RendimientoError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from prediction service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {}", describe_fields(.0))]
    Validation(Vec<(Feature, FieldError)>),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RendimientoError {
    /// Fields rejected by validation, empty for every other kind of failure.
    pub fn field_errors(&self) -> &[(Feature, FieldError)] {
        match self {
            RendimientoError::Validation(fields) => fields,
            _ => &[],
        }
    }
}

fn describe_fields(fields: &[(Feature, FieldError)]) -> String {
    fields
        .iter()
        .map(|(feature, err)| format!("{}: {}", feature.label(), err))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, RendimientoError>;
