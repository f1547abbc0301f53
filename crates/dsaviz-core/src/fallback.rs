//! Minimal traces for when the generator gives us nothing usable.
//!
//! With a parseable input literal the trace has one step per [`Phase`];
//! otherwise a single placeholder step is produced. Either way the result is
//! non-empty, so the playback surface always has something to show.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::InvalidInputLiteral;
use crate::model::{AlgorithmType, Step};

/// Lifecycle phases of a synthesized trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Processing,
    Completed,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Started, Phase::Processing, Phase::Completed];

    fn description(self) -> &'static str {
        match self {
            Phase::Started => "Algorithm execution started",
            Phase::Processing => "Processing algorithm logic",
            Phase::Completed => "Algorithm execution completed",
        }
    }

    fn highlight(self) -> &'static str {
        match self {
            Phase::Started => "function started",
            Phase::Processing => "main algorithm body",
            Phase::Completed => "return statement",
        }
    }
}

/// Parses the user's input box as a JSON literal (array, object or scalar).
pub fn parse_input_literal(input: &str) -> Result<Value, InvalidInputLiteral> {
    serde_json::from_str(input).map_err(|source| InvalidInputLiteral { source })
}

/// Builds the fallback trace for `input`, rendered as `algorithm_type`.
///
/// Returns three steps when `input` is a JSON literal and one otherwise.
/// The trace does not depend on `code`; callers classify it beforehand.
pub fn generate(_code: &str, input: &str, algorithm_type: AlgorithmType) -> Vec<Step> {
    match parse_input_literal(input) {
        Ok(parsed) => Phase::ALL
            .iter()
            .enumerate()
            .map(|(id, phase)| phase_step(id as u64, *phase, &parsed, algorithm_type))
            .collect(),
        Err(_) => vec![placeholder_step(algorithm_type)],
    }
}

fn phase_step(id: u64, phase: Phase, input: &Value, algorithm_type: AlgorithmType) -> Step {
    // Only arrays can be drawn straight from the input literal.
    let snapshot = if algorithm_type == AlgorithmType::Array {
        input.clone()
    } else {
        Value::Array(Vec::new())
    };

    Step {
        id,
        description: phase.description().to_string(),
        highlight: phase.highlight().to_string(),
        variables: IndexMap::from([("input".to_string(), input.clone())]),
        data_structure: IndexMap::from([(algorithm_type.as_str().to_string(), snapshot)]),
    }
}

fn placeholder_step(algorithm_type: AlgorithmType) -> Step {
    Step {
        id: 0,
        description: "Algorithm analysis completed".to_string(),
        highlight: "Unable to generate detailed steps".to_string(),
        variables: IndexMap::new(),
        data_structure: IndexMap::from([(
            algorithm_type.as_str().to_string(),
            Value::Array(Vec::new()),
        )]),
    }
}
