//! Plain-text rendering of trace steps for terminal playback.

use std::fmt::Write;

use dsaviz_core::{AnalysisResult, Step};
use serde_json::Value;

/// Header printed before playback starts.
pub fn render_header(result: &AnalysisResult) -> String {
    format!(
        "{} algorithm, {} step(s)\n{}\n",
        result.algorithm_type,
        result.steps.len(),
        result.explanation
    )
}

/// Renders `step` as the `position`-th of `len` frames.
pub fn render_step(step: &Step, position: usize, len: usize) -> String {
    let mut out = format!("[{}/{}] {}\n", position + 1, len, step.description);

    if !step.highlight.is_empty() {
        let _ = writeln!(out, "  > {}", step.highlight);
    }

    if !step.variables.is_empty() {
        let vars: Vec<String> = step
            .variables
            .iter()
            .map(|(name, value)| format!("{name} = {}", inline_value(value)))
            .collect();
        let _ = writeln!(out, "  {}", vars.join(", "));
    }

    for (name, value) in &step.data_structure {
        let _ = writeln!(out, "  {name}: {}", inline_value(value));
    }

    out
}

/// Renders every step after `shown` up to and including `current`, so frames
/// skipped between two observations still get printed. A backward move
/// renders just `current`.
pub fn render_advance(steps: &[Step], shown: usize, current: usize) -> String {
    let first = if current > shown { shown + 1 } else { current };
    let last = current.min(steps.len().saturating_sub(1));
    (first..=last)
        .filter_map(|position| steps.get(position).map(|step| (position, step)))
        .map(|(position, step)| render_step(step, position, steps.len()))
        .collect()
}

// Strings print bare; everything else as compact JSON.
fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
