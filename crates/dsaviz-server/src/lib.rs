//! HTTP service turning algorithm source code into playable traces.
//!
//! Wraps the `dsaviz-core` normalization pipeline behind `POST /analyze`,
//! with the upstream generation service reached through the
//! [`llm_provider::Generator`] seam.

pub mod config;
pub mod error;
pub mod handlers;
pub mod llm_provider;
pub mod pipeline;
pub mod router;
pub mod state;
