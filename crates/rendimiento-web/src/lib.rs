//! rendimiento-web — Operator console for the SAG throughput model.
//! Provides:
//!   - the eight-reading prediction form
//!   - a JSON view of the form state for scripts
//!   - a live event stream of submission outcomes

pub mod router;
pub mod handlers;
pub mod render;
pub mod state;
pub mod sse;
