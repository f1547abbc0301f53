//! Prompt -> upstream -> normalizer orchestration.

use std::sync::Arc;

use dsaviz_core::{normalize_with_report, prompt, AnalysisRequest, AnalysisResult, Provenance};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SamplingParams;
use crate::llm_provider::{Generator, UpstreamError};

/// Runs one analysis per request against a shared generator.
///
/// Holds no mutable state; concurrent `analyze` calls are independent.
pub struct AnalysisPipeline {
    generator: Arc<dyn Generator>,
    sampling: SamplingParams,
}

impl AnalysisPipeline {
    pub fn new(generator: Arc<dyn Generator>, sampling: SamplingParams) -> Self {
        AnalysisPipeline {
            generator,
            sampling,
        }
    }

    pub fn sampling(&self) -> &SamplingParams {
        &self.sampling
    }

    /// Analyzes `request`, making exactly one upstream call.
    ///
    /// Only transport failures are returned as errors; any payload the
    /// upstream sends back is normalized into a valid result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, UpstreamError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "analyze",
            %request_id,
            provider = self.generator.provider_name(),
            code_len = request.code.len(),
        );

        async move {
            let prompt = prompt::build(&request.code, &request.input);

            let raw = match self.generator.generate(&prompt, &self.sampling).await {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::error!(error = %err, "upstream unavailable");
                    return Err(err);
                }
            };
            tracing::debug!(bytes = raw.len(), "upstream payload received");

            let normalized = normalize_with_report(&raw, &request.code, &request.input);
            match &normalized.provenance {
                Provenance::Upstream { repaired: false } => {}
                Provenance::Upstream { repaired: true } => {
                    tracing::warn!("closed truncated JSON in upstream payload");
                }
                Provenance::Fallback(reason) => {
                    tracing::warn!(%reason, "upstream payload unusable, using heuristic trace");
                }
            }

            let result = normalized.result;
            tracing::info!(
                algorithm_type = %result.algorithm_type,
                steps = result.steps.len(),
                "analysis complete"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
