//! Application state shared by all handlers.
//!
//! The pipeline is immutable after construction, so it is shared through a
//! plain `Arc` without any lock.

use std::sync::Arc;

use crate::config::{SamplingParams, ServerConfig};
use crate::llm_provider::{Generator, HttpGenerator, UpstreamError};
use crate::pipeline::AnalysisPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    /// Creates state backed by the HTTP upstream described in `config`.
    pub fn new(config: &ServerConfig) -> Result<Self, UpstreamError> {
        let generator = HttpGenerator::new(config.upstream.clone())?;
        Ok(Self::with_generator(Arc::new(generator), config.sampling))
    }

    /// Creates state around any generator (used by tests with a fake upstream).
    pub fn with_generator(generator: Arc<dyn Generator>, sampling: SamplingParams) -> Self {
        AppState {
            pipeline: Arc::new(AnalysisPipeline::new(generator, sampling)),
        }
    }
}
