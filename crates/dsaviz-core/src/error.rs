//! Recoverable failure modes of the normalization pipeline.
//!
//! Neither error ever reaches an HTTP caller: both are absorbed by the
//! fallback path. They exist so callers can log *why* a degraded result was
//! produced.

use thiserror::Error;

/// The upstream payload could not be turned into a structured result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPayload {
    /// The transport body itself is not JSON.
    #[error("upstream body is not JSON: {0}")]
    NotJson(String),

    /// None of the known envelope paths held any generated text.
    #[error("no generated text at any known envelope path")]
    MissingContent,

    /// The generated text is still not JSON after fence stripping and repair.
    #[error("generated text is not valid JSON after repair: {message}")]
    InvalidJson { message: String, content: String },

    /// The generated text parsed, but to something other than a JSON object.
    #[error("generated JSON is not an object")]
    NotAnObject { content: String },
}

impl MalformedPayload {
    /// Generated text that was extracted before the failure, if any.
    pub fn salvaged_text(&self) -> Option<&str> {
        match self {
            MalformedPayload::InvalidJson { content, .. }
            | MalformedPayload::NotAnObject { content } => Some(content.as_str()),
            MalformedPayload::NotJson(_) | MalformedPayload::MissingContent => None,
        }
    }
}

/// The caller-supplied input value is not a JSON literal.
#[derive(Debug, Error)]
#[error("input is not a JSON literal: {source}")]
pub struct InvalidInputLiteral {
    #[source]
    pub source: serde_json::Error,
}
