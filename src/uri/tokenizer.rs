//! URI template tokenization.
//!
//! # Responsibilities
//! - Split a path pattern into ordered literal and variable segments
//! - Preserve left-to-right order, including empty literal pieces
//! - Reassemble a segment sequence back into the original pattern
//!
//! # Design Decisions
//! - Variables are bracketed, non-nested: `[name]`
//! - Unmatched `[` or `]` is ordinary literal text (the tokenizer aids
//!   duplicate detection and display, not routing)
//! - No regex to guarantee O(n) tokenization

use serde::{Deserialize, Serialize};

/// One piece of a tokenized URI template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Fixed text, matched verbatim. May be empty between adjacent variables.
    Literal(String),
    /// A named variable placeholder, `[name]` in the source pattern.
    Variable(String),
}

impl Segment {
    /// The segment's raw value (literal text or variable name).
    pub fn value(&self) -> &str {
        match self {
            Segment::Literal(v) | Segment::Variable(v) => v,
        }
    }

    /// True for [`Segment::Literal`].
    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Tokenize a path pattern into an ordered segment sequence.
///
/// Every variable is preceded and followed by a literal segment, which may
/// be empty; a pattern without variables is a single literal. Empty input
/// yields an empty sequence (rejected by the caller, not here).
pub fn tokenize(definition: &str) -> Vec<Segment> {
    if definition.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut rest = definition;

    loop {
        let pair = rest.find('[').and_then(|open| {
            rest[open + 1..].find(']').map(|rel| (open, open + 1 + rel))
        });

        match pair {
            Some((open, close)) => {
                segments.push(Segment::Literal(rest[..open].to_string()));
                segments.push(Segment::Variable(rest[open + 1..close].to_string()));
                rest = &rest[close + 1..];
            }
            // No complete bracket pair left; the remainder is literal text.
            None => {
                segments.push(Segment::Literal(rest.to_string()));
                break;
            }
        }
    }

    segments
}

/// Reassemble a segment sequence into its source pattern.
///
/// Inverse of [`tokenize`]: literals verbatim, variables re-wrapped in
/// brackets.
pub fn recompose(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(v) => out.push_str(v),
            Segment::Variable(v) => {
                out.push('[');
                out.push_str(v);
                out.push(']');
            }
        }
    }
    out
}
