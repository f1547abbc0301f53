//! Best-effort cleanup of generated JSON text.
//!
//! Generators sometimes wrap their answer in a markdown fence or stop
//! mid-object when they hit their output limit. These helpers undo the
//! common cases. They are heuristics, not a JSON repair algorithm: braces
//! and brackets are counted without regard to string literals.

use std::borrow::Cow;

/// Removes a surrounding markdown code fence, with or without a language tag.
///
/// Text that does not start with a fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
        .trim_start();
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim_end()
}

/// Appends closing braces when truncation left objects open.
///
/// Only applies when the text does not already end with `}` and contains
/// more `{` than `}`; exactly `opens - closes` braces are appended. Arrays
/// left open inside the unclosed objects get their `]` interleaved in
/// nesting order so the usual truncated-steps payload becomes parseable.
/// Anything else is returned unchanged (borrowed).
pub fn repair_braces(text: &str) -> Cow<'_, str> {
    if text.ends_with('}') {
        return Cow::Borrowed(text);
    }

    let opens = text.matches('{').count();
    let closes = text.matches('}').count();
    if opens <= closes {
        return Cow::Borrowed(text);
    }

    let mut repaired = String::with_capacity(text.len() + 2 * (opens - closes));
    repaired.push_str(text);
    repaired.push_str(&closing_sequence(text, opens - closes));
    Cow::Owned(repaired)
}

fn closing_sequence(text: &str, missing_braces: usize) -> String {
    let mut open: Vec<char> = Vec::new();
    for c in text.chars() {
        match c {
            '{' | '[' => open.push(c),
            '}' | ']' => {
                let opener = if c == '}' { '{' } else { '[' };
                // A closer discards everything above its nearest opener.
                if let Some(pos) = open.iter().rposition(|&o| o == opener) {
                    open.truncate(pos);
                }
            }
            _ => {}
        }
    }

    let mut closing = String::new();
    let mut braces = 0;
    for opener in open.iter().rev() {
        if *opener == '{' {
            if braces == missing_braces {
                break;
            }
            closing.push('}');
            braces += 1;
        } else {
            closing.push(']');
        }
    }
    while braces < missing_braces {
        closing.push('}');
        braces += 1;
    }
    closing
}
