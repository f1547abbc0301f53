//! Prompt templates for the upstream trace generator.

use serde::Serialize;

/// Upper bound on the number of steps requested from the generator.
pub const MAX_STEPS: usize = 5;

/// Word limit requested for the explanation.
pub const MAX_EXPLANATION_WORDS: usize = 100;

/// System message fixing the assistant's role.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes algorithms and provides step-by-step execution traces with data structure visualizations. Always return complete, valid JSON responses.";

/// Shape the generator is asked to reproduce.
const RESPONSE_SHAPE: &str = r#"{
  "algorithmType": "array",
  "explanation": "Brief explanation of the algorithm",
  "steps": [
    {
      "id": 0,
      "description": "Step description",
      "highlight": "code line",
      "variables": {"i": 0, "j": 0},
      "dataStructure": {"array": [64, 34, 25], "currentIndex": 0}
    }
  ]
}"#;

/// The message pair sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub system_message: String,
    pub user_message: String,
}

/// Builds the prompt for one analysis request.
pub fn build(code: &str, input: &str) -> Prompt {
    let user_message = format!(
        r#"Analyze this algorithm and provide a COMPLETE JSON response. Make sure the JSON is complete and properly terminated.

Required JSON structure:
{RESPONSE_SHAPE}

Requirements:
1. Set algorithmType to the primary data structure: stack, queue, array, tree, graph, hash, linkedlist or other
2. Generate at most {MAX_STEPS} steps
3. Keep the explanation brief (under {MAX_EXPLANATION_WORDS} words)
4. Every step must have id, description, highlight, variables and dataStructure
5. Return ONLY one valid, complete JSON object
6. No markdown, no code fences, no extra text

Code: {code}
Input: {input}

RETURN COMPLETE JSON ONLY:"#
    );

    Prompt {
        system_message: SYSTEM_PROMPT.to_string(),
        user_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_code_and_input_verbatim() {
        let prompt = build("function f(a) { return a; }", "[1, 2]");
        assert!(prompt
            .user_message
            .contains("Code: function f(a) { return a; }\nInput: [1, 2]"));
        assert!(prompt.user_message.ends_with("RETURN COMPLETE JSON ONLY:"));
    }

    #[test]
    fn user_message_states_limits() {
        let prompt = build("", "");
        assert!(prompt.user_message.contains("at most 5 steps"));
        assert!(prompt.user_message.contains("under 100 words"));
        assert!(prompt.user_message.contains("No markdown, no code fences"));
        for field in ["\"id\"", "\"description\"", "\"highlight\"", "\"variables\"", "\"dataStructure\""] {
            assert!(prompt.user_message.contains(field), "missing {field}");
        }
    }

    #[test]
    fn system_message_is_fixed() {
        let a = build("x", "1");
        let b = build("y", "2");
        assert_eq!(a.system_message, b.system_message);
        insta::assert_snapshot!(a.system_message, @"You are a helpful assistant that analyzes algorithms and provides step-by-step execution traces with data structure visualizations. Always return complete, valid JSON responses.");
    }

    #[test]
    fn serializes_as_camel_case_pair() {
        let value = serde_json::to_value(build("c", "i")).unwrap();
        assert!(value["systemMessage"].is_string());
        assert!(value["userMessage"].is_string());
    }
}
