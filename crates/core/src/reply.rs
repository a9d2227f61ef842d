//! Structured model replies.
//!
//! Some models interleave private reasoning with the answer, delimited by
//! `<thinking>` … `</thinking>`. The reply is split at the model boundary so
//! the rest of the system works with a separate `reasoning` and `answer`
//! instead of scraping strings later on.

use serde::{Deserialize, Serialize};

const REASONING_OPEN: &str = "<thinking>";
const REASONING_CLOSE: &str = "</thinking>";

/// A model reply split into its reasoning and answer parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    /// The raw model text, exactly as generated.
    pub text: String,

    /// Reasoning segments, joined by blank lines. `None` when there were none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// The text with every complete reasoning block removed, trimmed.
    pub answer: String,
}

impl ModelReply {
    pub fn from_text(text: &str) -> Self {
        let mut segments = Vec::new();
        let answer = strip_into(text, &mut segments);
        let segments: Vec<String> = segments.into_iter().filter(|s| !s.is_empty()).collect();

        Self {
            text: text.to_string(),
            reasoning: if segments.is_empty() { None } else { Some(segments.join("\n\n")) },
            answer,
        }
    }
}

/// Remove every complete reasoning block and trim the result.
///
/// Removal repeats until no complete block remains, so
/// `strip_reasoning(&strip_reasoning(x)) == strip_reasoning(x)`.
pub fn strip_reasoning(text: &str) -> String {
    strip_into(text, &mut Vec::new())
}

fn strip_into(text: &str, segments: &mut Vec<String>) -> String {
    let mut current = text.to_string();
    while let Some(next) = remove_blocks(&current, segments) {
        current = next;
    }
    current.trim().to_string()
}

/// One left-to-right pass. Returns `None` when no complete block was found.
fn remove_blocks(text: &str, segments: &mut Vec<String>) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut removed = false;

    while let Some(start) = rest.find(REASONING_OPEN) {
        let inner = &rest[start + REASONING_OPEN.len()..];
        let Some(end) = inner.find(REASONING_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        segments.push(inner[..end].trim().to_string());
        rest = &inner[end + REASONING_CLOSE.len()..];
        removed = true;
    }

    if !removed {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        let reply = ModelReply::from_text("Easy 5K today.");
        assert_eq!(reply.answer, "Easy 5K today.");
        assert_eq!(reply.text, "Easy 5K today.");
        assert!(reply.reasoning.is_none());
    }

    #[test]
    fn removes_multiline_block() {
        let text = "<thinking>\nuser is a beginner\nkeep it short\n</thinking>\n\nStart with run/walk intervals.";
        let reply = ModelReply::from_text(text);
        assert_eq!(reply.answer, "Start with run/walk intervals.");
        assert_eq!(reply.reasoning.as_deref(), Some("user is a beginner\nkeep it short"));
        assert_eq!(reply.text, text);
    }

    #[test]
    fn removes_every_block() {
        let stripped = strip_reasoning("a<thinking>1</thinking>b<thinking>2</thinking>c");
        assert_eq!(stripped, "abc");
    }

    #[test]
    fn unterminated_block_is_kept() {
        let stripped = strip_reasoning("Answer <thinking>never closed");
        assert_eq!(stripped, "Answer <thinking>never closed");
    }

    #[test]
    fn nested_markers_collapse_in_one_call() {
        // Removing the inner block exposes a new complete block.
        let text = "<thin<thinking>x</thinking>king>hidden</thinking>Shown";
        assert_eq!(strip_reasoning(text), "Shown");
    }

    #[test]
    fn stripping_is_idempotent() {
        let samples = [
            "",
            "   padded   ",
            "<thinking>only reasoning</thinking>",
            "<thin<thinking>x</thinking>king>y</thinking> tail ",
            "head <thinking>a</thinking> mid <thinking>b",
            "</thinking> stray close <thinking>",
            "<thinking><thinking>double</thinking></thinking>",
        ];
        for sample in samples {
            let once = strip_reasoning(sample);
            assert_eq!(strip_reasoning(&once), once, "not idempotent for {sample:?}");
        }
    }
}
