//! rendimiento-common — Shared types and errors used across all Rendimiento crates.
//!
//! The remote model is fed eight SAG mill process readings; everything that
//! names, holds, validates or serialises those readings lives here.

pub mod error;
pub mod features;
pub mod form;
pub mod prediction;

// Re-export commonly used types
pub use error::{RendimientoError, Result};
pub use features::Feature;
pub use form::{FieldError, FormState};
pub use prediction::{ErrorBody, PredictionInput, PredictionOutput};
