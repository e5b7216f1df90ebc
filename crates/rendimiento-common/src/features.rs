//! The eight process readings the throughput model is trained on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RendimientoError;

/// One input column of the throughput model.
///
/// Declaration order is the column order of the training data and the order
/// in which the form renders its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// SAG mill rotation speed (rpm)
    VelocidadSagRpm,
    /// Water flow into the mill (m³/h)
    FlujoDeAguaM3H,
    /// Geometallurgical unit 1 share
    Ugm1,
    /// Geometallurgical unit 2 share
    Ugm2,
    /// Geometallurgical unit 3 share
    Ugm3,
    /// Coarse fraction (%)
    PorcGrueso,
    /// Intermediate fraction (%)
    PorcIntermedio,
    /// Fine fraction (%)
    PorcFino,
}

impl Feature {
    pub const COUNT: usize = 8;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::VelocidadSagRpm,
        Feature::FlujoDeAguaM3H,
        Feature::Ugm1,
        Feature::Ugm2,
        Feature::Ugm3,
        Feature::PorcGrueso,
        Feature::PorcIntermedio,
        Feature::PorcFino,
    ];

    /// Wire name used in the request body and as the HTML input name.
    pub const fn key(self) -> &'static str {
        match self {
            Feature::VelocidadSagRpm => "velocidad_sag_rpm",
            Feature::FlujoDeAguaM3H  => "flujo_de_agua_m3_h",
            Feature::Ugm1            => "ugm1",
            Feature::Ugm2            => "ugm2",
            Feature::Ugm3            => "ugm3",
            Feature::PorcGrueso      => "porc_grueso",
            Feature::PorcIntermedio  => "porc_intermedio",
            Feature::PorcFino        => "porc_fino",
        }
    }

    /// Human label: the key with underscores replaced by spaces.
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }

    /// Position in [`Feature::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = RendimientoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| RendimientoError::UnknownField(s.to_string()))
    }
}
