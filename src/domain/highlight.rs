//! Keyword highlighting for rule text.
//!
//! Reports where the interpreter's vocabulary occurs inside a single rule so a
//! front end can show the user which words the simulator will act on.

use crate::domain::signal::{Keyword, VOCABULARY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpan {
    /// Byte offsets into the original rule string.
    pub start: usize,
    pub end: usize,
    pub keyword: Keyword,
}

/// Find non-overlapping vocabulary matches, scanning left to right.
///
/// At each position the longest vocabulary entry wins, so "close above" is
/// one span rather than being cut short by a shorter entry.
pub fn highlight_rule(rule: &str) -> Vec<KeywordSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < rule.len() {
        if !rule.is_char_boundary(pos) {
            pos += 1;
            continue;
        }
        let rest = &rule[pos..];
        let hit = VOCABULARY
            .iter()
            .filter(|(word, _)| starts_with_ignore_case(rest, word))
            .max_by_key(|(word, _)| word.len());

        match hit {
            Some((word, keyword)) => {
                spans.push(KeywordSpan {
                    start: pos,
                    end: pos + word.len(),
                    keyword: *keyword,
                });
                pos += word.len();
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }

    spans
}

/// Wrap every match in square brackets.
pub fn render_highlighted(rule: &str) -> String {
    let mut out = String::with_capacity(rule.len() + 8);
    let mut last = 0;
    for span in highlight_rule(rule) {
        out.push_str(&rule[last..span.start]);
        out.push('[');
        out.push_str(&rule[span.start..span.end]);
        out.push(']');
        last = span.end;
    }
    out.push_str(&rule[last..]);
    out
}

// Vocabulary is ASCII, so a byte-wise comparison keeps offsets on char boundaries.
fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}
