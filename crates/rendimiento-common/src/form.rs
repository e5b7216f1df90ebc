//! Operator form state and the numeric validation applied before submission.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RendimientoError, Result};
use crate::features::Feature;
use crate::prediction::PredictionInput;

lazy_static! {
    /// Decimal literal as accepted by an HTML number input: optional sign,
    /// digits with an optional fraction (or a bare fraction), optional exponent.
    static ref NUMERIC: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("numeric grammar is a valid regex");
}

/// Why a field could not be turned into a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    Missing,
    NotANumber { raw: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing => f.write_str("value is required"),
            FieldError::NotANumber { raw } => write!(f, "'{raw}' is not a number"),
        }
    }
}

/// Parse one field's text into a finite reading.
///
/// Surrounding whitespace is ignored. The grammar is locale-agnostic, so
/// `1,5` is rejected rather than read as one and a half.
pub fn parse_reading(raw: &str) -> std::result::Result<f64, FieldError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(FieldError::Missing);
    }
    if !NUMERIC.is_match(text) {
        return Err(FieldError::NotANumber { raw: raw.to_string() });
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::NotANumber { raw: raw.to_string() }),
    }
}

/// Text the operator has typed, one slot per [`Feature`].
///
/// All eight keys are always present; values are free text until
/// [`FormState::parse`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: [String; Feature::COUNT],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `raw` verbatim. No validation happens here.
    pub fn set(&mut self, feature: Feature, raw: impl Into<String>) {
        self.values[feature.index()] = raw.into();
    }

    /// Like [`FormState::set`], addressed by wire key.
    pub fn set_by_key(&mut self, key: &str, raw: impl Into<String>) -> Result<Feature> {
        let feature: Feature = key.parse()?;
        self.set(feature, raw);
        Ok(feature)
    }

    pub fn get(&self, feature: Feature) -> &str {
        &self.values[feature.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, &str)> {
        Feature::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate every field and collect either all readings or all failures.
    pub fn parse(&self) -> Result<PredictionInput> {
        let mut readings = [0.0_f64; Feature::COUNT];
        let mut failures = Vec::new();

        for (feature, raw) in self.iter() {
            match parse_reading(raw) {
                Ok(v) => readings[feature.index()] = v,
                Err(e) => failures.push((feature, e)),
            }
        }

        if failures.is_empty() {
            Ok(PredictionInput::from_readings(readings))
        } else {
            Err(RendimientoError::Validation(failures))
        }
    }
}
