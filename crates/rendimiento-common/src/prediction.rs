//! Request and response bodies exchanged with the prediction service.

use serde::{Deserialize, Serialize};

use crate::features::Feature;

/// Request body: one JSON number per feature, keyed by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub velocidad_sag_rpm: f64,
    pub flujo_de_agua_m3_h: f64,
    pub ugm1: f64,
    pub ugm2: f64,
    pub ugm3: f64,
    pub porc_grueso: f64,
    pub porc_intermedio: f64,
    pub porc_fino: f64,
}

impl PredictionInput {
    /// Build from readings laid out in [`Feature::ALL`] order.
    pub fn from_readings(r: [f64; Feature::COUNT]) -> Self {
        Self {
            velocidad_sag_rpm:  r[Feature::VelocidadSagRpm.index()],
            flujo_de_agua_m3_h: r[Feature::FlujoDeAguaM3H.index()],
            ugm1:               r[Feature::Ugm1.index()],
            ugm2:               r[Feature::Ugm2.index()],
            ugm3:               r[Feature::Ugm3.index()],
            porc_grueso:        r[Feature::PorcGrueso.index()],
            porc_intermedio:    r[Feature::PorcIntermedio.index()],
            porc_fino:          r[Feature::PorcFino.index()],
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::VelocidadSagRpm => self.velocidad_sag_rpm,
            Feature::FlujoDeAguaM3H  => self.flujo_de_agua_m3_h,
            Feature::Ugm1            => self.ugm1,
            Feature::Ugm2            => self.ugm2,
            Feature::Ugm3            => self.ugm3,
            Feature::PorcGrueso      => self.porc_grueso,
            Feature::PorcIntermedio  => self.porc_intermedio,
            Feature::PorcFino        => self.porc_fino,
        }
    }
}

/// Successful response. Fields beyond these two are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutput {
    /// Predicted mill throughput in tonnes per hour.
    pub predicted_rendimiento_t_h: f64,
    /// Identifier of the deployed model that served the prediction.
    pub model_used: String,
}

/// Error body returned by the gateway on 4xx/5xx.
///
/// The Lambda behind the gateway answers `{"error": ...}`; the gateway itself
/// answers `{"message": ...}` when it rejects a request before the Lambda runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "message")]
    pub error: String,
}
