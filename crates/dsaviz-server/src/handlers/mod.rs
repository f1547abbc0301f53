//! HTTP handler modules.
//!
//! Handlers only decode requests, delegate to the [`AnalysisPipeline`] and
//! encode responses. No business logic lives here.
//!
//! [`AnalysisPipeline`]: crate::pipeline::AnalysisPipeline

pub mod analyze;
pub mod health;
