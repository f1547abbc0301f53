//! Converts an untrusted upstream payload into a valid [`AnalysisResult`].
//!
//! The stages run in order: envelope unwrap, fence stripping, brace repair,
//! structural coercion. Any failure falls through to a heuristic result
//! built from [`classify`](crate::classify::classify) and
//! [`fallback::generate`], so [`normalize`] is total.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::classify::classify;
use crate::error::MalformedPayload;
use crate::fallback;
use crate::model::{AlgorithmType, AnalysisResult, Step, DEFAULT_EXPLANATION};
use crate::repair::{repair_braces, strip_code_fence};

/// JSON pointers to the generated text, tried in order.
///
/// The first two are the credentialed gateway's envelopes; the last is a
/// plain OpenAI-compatible chat completion.
const CONTENT_POINTERS: &[&str] = &[
    "/response/openAIResponse/choices/0/message/content",
    "/response/choices/0/message/content",
    "/choices/0/message/content",
];

/// Which path produced a normalized result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Parsed from the generator's output; `repaired` is set when closing
    /// braces had to be appended.
    Upstream { repaired: bool },
    /// Synthesized locally because the payload was unusable.
    Fallback(MalformedPayload),
}

/// A normalized result together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub result: AnalysisResult,
    pub provenance: Provenance,
}

/// Normalizes a raw upstream body. Never fails.
pub fn normalize(raw: &str, code: &str, input: &str) -> AnalysisResult {
    normalize_with_report(raw, code, input).result
}

/// Like [`normalize`], but also reports whether the fallback path was taken.
pub fn normalize_with_report(raw: &str, code: &str, input: &str) -> Normalized {
    match parse_payload(raw) {
        Ok((result, repaired)) => Normalized {
            result,
            provenance: Provenance::Upstream { repaired },
        },
        Err(reason) => Normalized {
            result: fallback_result(code, input, reason.salvaged_text()),
            provenance: Provenance::Fallback(reason),
        },
    }
}

/// Returns the generated text from a transport envelope, if any path has it.
pub fn extract_content(envelope: &Value) -> Option<&str> {
    CONTENT_POINTERS
        .iter()
        .filter_map(|pointer| envelope.pointer(pointer).and_then(Value::as_str))
        .map(str::trim)
        .find(|content| !content.is_empty())
}

/// The heuristic result used when the payload is unusable.
///
/// `salvaged` is generated text recovered before parsing failed; it becomes
/// the explanation when it is not blank.
pub fn fallback_result(code: &str, input: &str, salvaged: Option<&str>) -> AnalysisResult {
    let algorithm_type = classify(code);
    let explanation = match salvaged.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!(
            "This appears to be a {algorithm_type} algorithm. Unable to provide detailed analysis due to response parsing error."
        ),
    };

    AnalysisResult {
        algorithm_type,
        explanation,
        steps: fallback::generate(code, input, algorithm_type),
    }
}

fn parse_payload(raw: &str) -> Result<(AnalysisResult, bool), MalformedPayload> {
    let envelope: Value =
        serde_json::from_str(raw).map_err(|err| MalformedPayload::NotJson(err.to_string()))?;
    let content = extract_content(&envelope).ok_or(MalformedPayload::MissingContent)?;

    let stripped = strip_code_fence(content);
    let repaired = repair_braces(stripped);
    let was_repaired = matches!(repaired, Cow::Owned(_));

    let document: Value =
        serde_json::from_str(&repaired).map_err(|err| MalformedPayload::InvalidJson {
            message: err.to_string(),
            content: content.to_string(),
        })?;

    match document {
        Value::Object(fields) => Ok((coerce_result(fields), was_repaired)),
        _ => Err(MalformedPayload::NotAnObject {
            content: content.to_string(),
        }),
    }
}

fn coerce_result(mut fields: Map<String, Value>) -> AnalysisResult {
    let algorithm_type = fields
        .get("algorithmType")
        .and_then(Value::as_str)
        .and_then(AlgorithmType::from_label)
        .unwrap_or_default();

    let explanation = match fields.remove("explanation") {
        Some(Value::String(text)) if !text.trim().is_empty() => text,
        _ => DEFAULT_EXPLANATION.to_string(),
    };

    let steps = match fields.remove("steps") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(step) => Some(step),
                _ => None,
            })
            .enumerate()
            .map(|(position, step)| coerce_step(position as u64, step))
            .collect(),
        _ => Vec::new(),
    };

    AnalysisResult {
        algorithm_type,
        explanation,
        steps,
    }
}

fn coerce_step(position: u64, mut fields: Map<String, Value>) -> Step {
    let id = match fields.get("id") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .unwrap_or(position);

    Step {
        id,
        description: text_field(fields.remove("description")),
        highlight: text_field(fields.remove("highlight")),
        variables: mapping_field(fields.remove("variables")),
        data_structure: mapping_field(fields.remove("dataStructure")),
    }
}

fn text_field(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn mapping_field(value: Option<Value>) -> IndexMap<String, Value> {
    match value {
        Some(Value::Object(map)) => map.into_iter().collect(),
        _ => IndexMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn gateway_envelope(content: &str) -> String {
        json!({
            "response": {
                "openAIResponse": {
                    "choices": [{ "message": { "content": content } }]
                }
            }
        })
        .to_string()
    }

    fn five_step_trace() -> String {
        let steps: Vec<Value> = (0..5)
            .map(|i| {
                json!({
                    "id": i,
                    "description": format!("pass {i}"),
                    "highlight": "if (arr[j] > arr[j + 1])",
                    "variables": {"i": i, "j": 0},
                    "dataStructure": {"array": [64, 34, 25, 12, 22, 11, 90]}
                })
            })
            .collect();
        json!({
            "algorithmType": "array",
            "explanation": "Bubble sort repeatedly swaps adjacent elements.",
            "steps": steps
        })
        .to_string()
    }

    #[test]
    fn valid_payload_passes_through() {
        let raw = gateway_envelope(&five_step_trace());
        let normalized = normalize_with_report(&raw, "function bubbleSort(arr){}", "[1]");

        assert_eq!(normalized.provenance, Provenance::Upstream { repaired: false });
        let result = normalized.result;
        assert_eq!(result.algorithm_type, AlgorithmType::Array);
        assert_eq!(result.steps.len(), 5);
        let ids: Vec<u64> = result.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
        assert_eq!(result.steps[3].variables["i"], json!(3));
    }

    #[test]
    fn second_envelope_path_is_used() {
        let raw = json!({
            "response": {
                "choices": [{ "message": { "content": "{\"algorithmType\":\"queue\",\"steps\":[]}" } }]
            }
        })
        .to_string();
        let result = normalize(&raw, "", "");
        assert_eq!(result.algorithm_type, AlgorithmType::Queue);
    }

    #[test]
    fn openai_compatible_envelope_is_used() {
        let raw = json!({
            "choices": [{ "message": { "content": "{\"algorithmType\":\"tree\"}" } }]
        })
        .to_string();
        assert_eq!(normalize(&raw, "", "").algorithm_type, AlgorithmType::Tree);
    }

    #[test]
    fn empty_first_path_falls_through_to_next() {
        let raw = json!({
            "response": {
                "openAIResponse": { "choices": [{ "message": { "content": "   " } }] },
                "choices": [{ "message": { "content": "{\"algorithmType\":\"graph\"}" } }]
            }
        })
        .to_string();
        assert_eq!(normalize(&raw, "", "").algorithm_type, AlgorithmType::Graph);
    }

    #[test]
    fn fenced_and_truncated_payload_is_repaired() {
        let content = "```json\n{\"algorithmType\":\"stack\",\"explanation\":\"push then pop\",\"steps\":[{\"id\":0";
        let normalized = normalize_with_report(&gateway_envelope(content), "", "");

        assert_eq!(normalized.provenance, Provenance::Upstream { repaired: true });
        assert_eq!(normalized.result.algorithm_type, AlgorithmType::Stack);
        assert_eq!(normalized.result.explanation, "push then pop");
        assert_eq!(normalized.result.steps.len(), 1);
        assert_eq!(normalized.result.steps[0].description, "");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let result = normalize(&gateway_envelope("{}"), "stack.push(1)", "[1]");
        assert_eq!(result.algorithm_type, AlgorithmType::Other);
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn invalid_fields_get_defaults() {
        let content = json!({
            "algorithmType": "sliding-window",
            "explanation": "  ",
            "steps": {"id": 0}
        })
        .to_string();
        let result = normalize(&gateway_envelope(&content), "", "");
        assert_eq!(result.algorithm_type, AlgorithmType::Other);
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn steps_are_coerced_individually() {
        let content = json!({
            "algorithmType": "Linked List",
            "steps": [
                {"id": "7", "description": 3, "highlight": null, "variables": [1], "dataStructure": {"linkedlist": [1, 2]}},
                "not a step",
                {"description": "no id"},
                {"id": -1}
            ]
        })
        .to_string();
        let result = normalize(&gateway_envelope(&content), "", "");

        assert_eq!(result.algorithm_type, AlgorithmType::LinkedList);
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.steps[0].id, 7);
        assert_eq!(result.steps[0].description, "3");
        assert_eq!(result.steps[0].highlight, "");
        assert!(result.steps[0].variables.is_empty());
        assert_eq!(result.steps[0].data_structure["linkedlist"], json!([1, 2]));
        assert_eq!(result.steps[1].id, 1);
        assert_eq!(result.steps[2].id, 2);
    }

    #[test]
    fn unparseable_content_is_salvaged_as_explanation() {
        let raw = gateway_envelope("Sorry, I can only describe this in words.");
        let normalized = normalize_with_report(&raw, "function bubbleSort(arr){}", "[3, 1, 2]");

        assert!(matches!(
            normalized.provenance,
            Provenance::Fallback(MalformedPayload::InvalidJson { .. })
        ));
        let result = normalized.result;
        assert_eq!(result.algorithm_type, AlgorithmType::Array);
        assert_eq!(result.explanation, "Sorry, I can only describe this in words.");
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.steps[0].data_structure["array"], json!([3, 1, 2]));
    }

    #[test]
    fn non_object_json_falls_back() {
        let normalized = normalize_with_report(&gateway_envelope("[1, 2, 3]"), "q.enqueue(1)", "oops");
        assert!(matches!(
            normalized.provenance,
            Provenance::Fallback(MalformedPayload::NotAnObject { .. })
        ));
        assert_eq!(normalized.result.algorithm_type, AlgorithmType::Queue);
        assert_eq!(normalized.result.explanation, "[1, 2, 3]");
        assert_eq!(normalized.result.steps.len(), 1);
    }

    #[test]
    fn unknown_envelope_uses_templated_explanation() {
        let raw = json!({"response": {"status": "ok"}}).to_string();
        let normalized = normalize_with_report(&raw, "stack.pop()", "[1]");

        assert_eq!(
            normalized.provenance,
            Provenance::Fallback(MalformedPayload::MissingContent)
        );
        assert_eq!(
            normalized.result.explanation,
            "This appears to be a stack algorithm. Unable to provide detailed analysis due to response parsing error."
        );
        assert_eq!(normalized.result.steps.len(), 3);
    }

    #[test]
    fn non_json_body_falls_back() {
        let normalized = normalize_with_report("<html>gateway timeout</html>", "", "");
        assert!(matches!(
            normalized.provenance,
            Provenance::Fallback(MalformedPayload::NotJson(_))
        ));
        assert_eq!(normalized.result.algorithm_type, AlgorithmType::Array);
        assert_eq!(normalized.result.steps.len(), 1);
    }

    #[test]
    fn empty_body_falls_back() {
        let result = normalize("", "", "");
        assert!(!result.explanation.is_empty());
        assert_eq!(result.steps.len(), 1);
    }

    proptest! {
        #[test]
        fn arbitrary_bodies_normalize(raw in ".{0,200}", code in ".{0,60}", input in ".{0,20}") {
            let result = normalize(&raw, &code, &input);
            prop_assert!(!result.explanation.is_empty());
            prop_assert!(AlgorithmType::ALL.contains(&result.algorithm_type));
        }

        #[test]
        fn arbitrary_generated_text_normalizes(content in ".{0,200}") {
            let result = normalize(&gateway_envelope(&content), "", "[1]");
            prop_assert!(!result.explanation.trim().is_empty());
        }

        #[test]
        fn truncated_trace_never_panics(cut in 0usize..400) {
            let trace = five_step_trace();
            let end = trace.char_indices().map(|(i, _)| i).nth(cut).unwrap_or(trace.len());
            let result = normalize(&gateway_envelope(&trace[..end]), "bubble", "[1]");
            prop_assert!(!result.explanation.is_empty());
        }
    }
}
