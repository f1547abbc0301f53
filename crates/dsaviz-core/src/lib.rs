//! Trace model and normalization pipeline for the dsaviz algorithm visualizer.
//!
//! Turns the untrusted text produced by a generation service into an
//! [`AnalysisResult`] that a playback surface can always render:
//!
//! - [`classify`] guesses the dominant data structure from source keywords.
//! - [`fallback`] synthesizes a minimal trace when nothing better exists.
//! - [`prompt`] builds the system/user messages sent upstream.
//! - [`repair`] strips code fences and closes truncated JSON.
//! - [`normalize`] unwraps the transport envelope and coerces the payload.

pub mod classify;
pub mod error;
pub mod fallback;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod repair;

// Re-export commonly used types
pub use classify::classify;
pub use error::{InvalidInputLiteral, MalformedPayload};
pub use model::{AlgorithmType, AnalysisRequest, AnalysisResult, Step, DEFAULT_EXPLANATION};
pub use normalize::{normalize, normalize_with_report, Normalized, Provenance};
pub use prompt::Prompt;
