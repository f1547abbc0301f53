//! Trace data model shared by the server, the playback controller and the CLI.
//!
//! Field names serialize in camelCase (`algorithmType`, `dataStructure`) to
//! match the JSON contract consumed by the visualization front end. Step
//! mappings use [`IndexMap`] so variables keep the order the generator
//! emitted them in.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explanation used when the generator omitted one.
pub const DEFAULT_EXPLANATION: &str = "Algorithm analysis completed";

/// Data-structure category a trace is rendered as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmType {
    Stack,
    Queue,
    Array,
    Tree,
    Graph,
    Hash,
    #[serde(rename = "linkedlist")]
    LinkedList,
    #[default]
    Other,
}

impl AlgorithmType {
    pub const ALL: [AlgorithmType; 8] = [
        AlgorithmType::Stack,
        AlgorithmType::Queue,
        AlgorithmType::Array,
        AlgorithmType::Tree,
        AlgorithmType::Graph,
        AlgorithmType::Hash,
        AlgorithmType::LinkedList,
        AlgorithmType::Other,
    ];

    /// The wire name, which is also the `dataStructure` key for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmType::Stack => "stack",
            AlgorithmType::Queue => "queue",
            AlgorithmType::Array => "array",
            AlgorithmType::Tree => "tree",
            AlgorithmType::Graph => "graph",
            AlgorithmType::Hash => "hash",
            AlgorithmType::LinkedList => "linkedlist",
            AlgorithmType::Other => "other",
        }
    }

    /// Parses a loosely formatted label as produced by a language model.
    ///
    /// Case, whitespace, `-` and `_` are ignored, so `"Linked List"` and
    /// `"linked_list"` both map to [`AlgorithmType::LinkedList`]. Returns
    /// `None` for labels outside the fixed set.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "stack" => Some(AlgorithmType::Stack),
            "queue" => Some(AlgorithmType::Queue),
            "array" => Some(AlgorithmType::Array),
            "tree" => Some(AlgorithmType::Tree),
            "graph" => Some(AlgorithmType::Graph),
            "hash" | "hashmap" | "hashtable" => Some(AlgorithmType::Hash),
            "linkedlist" => Some(AlgorithmType::LinkedList),
            "other" => Some(AlgorithmType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame of an execution trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: u64,
    pub description: String,
    /// Source fragment to highlight while this step is shown.
    pub highlight: String,
    #[serde(default)]
    pub variables: IndexMap<String, Value>,
    /// Structure snapshots keyed by structure name (`stack`, `array`, ...).
    #[serde(default)]
    pub data_structure: IndexMap<String, Value>,
}

/// The normalized output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub algorithm_type: AlgorithmType,
    pub explanation: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Source code and input literal submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default)]
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn algorithm_type_wire_names() {
        for ty in AlgorithmType::ALL {
            let encoded = serde_json::to_value(ty).unwrap();
            assert_eq!(encoded, json!(ty.as_str()));
            let decoded: AlgorithmType = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, ty);
        }
    }

    #[test]
    fn from_label_folds_case_and_separators() {
        assert_eq!(AlgorithmType::from_label("Stack"), Some(AlgorithmType::Stack));
        assert_eq!(
            AlgorithmType::from_label("linked list"),
            Some(AlgorithmType::LinkedList)
        );
        assert_eq!(
            AlgorithmType::from_label("Linked_List"),
            Some(AlgorithmType::LinkedList)
        );
        assert_eq!(AlgorithmType::from_label(" HashMap "), Some(AlgorithmType::Hash));
        assert_eq!(AlgorithmType::from_label("sliding-window"), None);
        assert_eq!(AlgorithmType::from_label(""), None);
    }

    #[test]
    fn step_uses_camel_case_and_keeps_key_order() {
        let step: Step = serde_json::from_value(json!({
            "id": 2,
            "description": "swap",
            "highlight": "[a, b] = [b, a]",
            "variables": {"j": 1, "i": 0},
            "dataStructure": {"array": [1, 2]}
        }))
        .unwrap();

        let keys: Vec<&str> = step.variables.keys().map(String::as_str).collect();
        assert_eq!(keys, ["j", "i"]);

        let encoded = serde_json::to_value(&step).unwrap();
        assert_eq!(encoded["dataStructure"]["array"], json!([1, 2]));
        assert!(encoded.get("data_structure").is_none());
    }

    #[test]
    fn request_input_defaults_to_empty() {
        let req: AnalysisRequest = serde_json::from_value(json!({"code": "x"})).unwrap();
        assert_eq!(req.input, "");
    }
}
