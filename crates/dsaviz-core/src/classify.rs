//! Keyword-based data-structure classifier.
//!
//! A cascade of keyword rules evaluated top to bottom; the first rule with a
//! keyword present in the lowercased source wins. Rule order is the
//! tie-break when several families appear in the same snippet.

use crate::model::AlgorithmType;

struct Rule {
    keywords: &'static [&'static str],
    algorithm_type: AlgorithmType,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["stack", "push", "pop"],
        algorithm_type: AlgorithmType::Stack,
    },
    Rule {
        keywords: &["queue", "enqueue", "dequeue"],
        algorithm_type: AlgorithmType::Queue,
    },
    Rule {
        keywords: &["sort", "bubble", "merge", "quick"],
        algorithm_type: AlgorithmType::Array,
    },
    Rule {
        keywords: &["tree", "node", "left", "right"],
        algorithm_type: AlgorithmType::Tree,
    },
    Rule {
        keywords: &["graph", "dfs", "bfs"],
        algorithm_type: AlgorithmType::Graph,
    },
    Rule {
        keywords: &["hash", "map", "key"],
        algorithm_type: AlgorithmType::Hash,
    },
    Rule {
        keywords: &["linkedlist", "next"],
        algorithm_type: AlgorithmType::LinkedList,
    },
];

/// Classifies source text. Never returns [`AlgorithmType::Other`]; code
/// matching no rule is treated as an array algorithm.
pub fn classify(code: &str) -> AlgorithmType {
    let lower = code.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|rule| rule.algorithm_type)
        .unwrap_or(AlgorithmType::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn each_family_is_detected() {
        let cases = [
            ("const s = []; s.push(1);", AlgorithmType::Stack),
            ("q.enqueue(3)", AlgorithmType::Queue),
            ("function bubbleSort(arr) {}", AlgorithmType::Array),
            ("if (root.left) visit(root.left)", AlgorithmType::Tree),
            ("function dfs(adj, v) {}", AlgorithmType::Graph),
            ("const seen = new Map()", AlgorithmType::Hash),
            ("while (cur.next) cur = cur.next", AlgorithmType::LinkedList),
        ];
        for (code, expected) in cases {
            assert_eq!(classify(code), expected, "code: {code}");
        }
    }

    #[test]
    fn earlier_rules_take_priority() {
        // stack beats sort
        assert_eq!(classify("stack.push(x); arr.sort()"), AlgorithmType::Stack);
        // queue beats tree
        assert_eq!(classify("queue.shift(); node.left"), AlgorithmType::Queue);
        // tree beats linked list ("node" appears before "next" is considered)
        assert_eq!(classify("node = node.next"), AlgorithmType::Tree);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("class MinSTACK {}"), AlgorithmType::Stack);
        assert_eq!(classify("function BFS(g) {}"), AlgorithmType::Graph);
    }

    #[test]
    fn unmatched_and_empty_default_to_array() {
        assert_eq!(classify(""), AlgorithmType::Array);
        assert_eq!(classify("let total = a + b;"), AlgorithmType::Array);
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(code in ".{0,200}") {
            prop_assert_eq!(classify(&code), classify(&code));
        }

        #[test]
        fn never_reports_other(code in ".{0,200}") {
            prop_assert_ne!(classify(&code), AlgorithmType::Other);
        }

        #[test]
        fn ascii_case_does_not_matter(code in "[ -~]{0,120}") {
            prop_assert_eq!(classify(&code), classify(&code.to_ascii_uppercase()));
        }
    }
}
