use async_trait::async_trait;
use rendimiento_common::{PredictionInput, PredictionOutput, Result};

/// Anything that can turn eight readings into a throughput prediction.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn predict(&self, input: &PredictionInput) -> Result<PredictionOutput>;
}
