//! Snippet-to-position resolution.
//!
//! Strategies (strict → loose):
//! 1) Whitespace-tolerant exact match: escape the snippet, let every
//!    whitespace run match any whitespace run, take the first hit. Survives
//!    re-wrapped or re-indented snippets.
//! 2) Fuzzy word anchors: take up to 3 significant words from the snippet,
//!    scan the first occurrence of each, and accept the first one whose
//!    surrounding window contains at least 2 of the words.
//!
//! Only the first plausible hit is taken on either pass. Resolution is
//! best-effort and bounded; a miss returns `None`, never an error.

use regex::Regex;
use tracing::{debug, trace};

use crate::findings::Position;

/// Snippets at or below this length skip the fuzzy pass; too ambiguous.
const MIN_FUZZY_SNIPPET_LEN: usize = 15;
/// Anchor words must be strictly longer than this.
const MIN_ANCHOR_WORD_LEN: usize = 3;
/// At most this many significant words are considered.
const MAX_ANCHOR_WORDS: usize = 3;
/// Characters of context inspected on each side of an anchor occurrence.
const ANCHOR_WINDOW: usize = 50;
/// A window must contain at least this many of the words (anchor included).
const MIN_WINDOW_HITS: usize = 2;

/// Locate `snippet` inside `document_text`, zero-based.
pub fn locate(snippet: Option<&str>, document_text: &str) -> Option<Position> {
    let raw = snippet?;
    if raw.trim().is_empty() {
        return None;
    }

    if let Some(pos) = locate_exact(raw.trim(), document_text) {
        return Some(pos);
    }

    if raw.len() > MIN_FUZZY_SNIPPET_LEN {
        return locate_by_anchors(raw, document_text);
    }
    None
}

/// First match of the escaped snippet with collapsed-whitespace tolerance.
fn locate_exact(snippet: &str, text: &str) -> Option<Position> {
    let pattern = whitespace_tolerant_pattern(snippet);
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            // Should not happen for an escaped snippet; fall through to fuzzy.
            trace!("snippet pattern rejected: {e}");
            return None;
        }
    };
    re.find(text).map(|m| {
        let pos = offset_to_position(text, m.start());
        trace!("snippet matched exactly at line {}", pos.line);
        pos
    })
}

/// Escape the snippet, then let any whitespace run match one-or-more
/// whitespace characters of any kind. Escaping never introduces literal
/// whitespace, so splitting the escaped text is safe.
fn whitespace_tolerant_pattern(snippet: &str) -> String {
    regex::escape(snippet)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Fuzzy fallback: first occurrence of each significant word, accepted when
/// its window holds at least `MIN_WINDOW_HITS` of the words.
fn locate_by_anchors(snippet: &str, text: &str) -> Option<Position> {
    let words: Vec<&str> = snippet
        .split_whitespace()
        .filter(|w| w.len() > MIN_ANCHOR_WORD_LEN)
        .take(MAX_ANCHOR_WORDS)
        .collect();
    if words.is_empty() {
        return None;
    }

    for anchor in &words {
        let Some(offset) = text.find(anchor) else {
            continue;
        };
        let window = window_around(text, offset, anchor.len(), ANCHOR_WINDOW);
        let hits = words.iter().filter(|w| window.contains(**w)).count();
        if hits >= MIN_WINDOW_HITS {
            let pos = offset_to_position(text, offset);
            debug!(
                "snippet matched fuzzily on '{anchor}' at line {} ({hits}/{} words)",
                pos.line,
                words.len()
            );
            return Some(pos);
        }
    }
    None
}

/// `pad` characters of context on each side of the match, clipped to the
/// document bounds.
fn window_around(text: &str, offset: usize, match_len: usize, pad: usize) -> &str {
    let before: usize = text[..offset].chars().rev().take(pad).map(char::len_utf8).sum();
    let match_end = offset + match_len;
    let after: usize = text[match_end..].chars().take(pad).map(char::len_utf8).sum();
    &text[offset - before..match_end + after]
}

/// Convert a byte offset into a zero-based line/column.
fn offset_to_position(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line = before.bytes().filter(|b| *b == b'\n').count() as u32;
    let column = match before.rfind('\n') {
        Some(nl) => (offset - nl - 1) as u32,
        None => offset as u32,
    };
    Position { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_snippet_is_none() {
        assert_eq!(locate(None, "fn main() {}"), None);
        assert_eq!(locate(Some(""), "fn main() {}"), None);
        assert_eq!(locate(Some("   \n "), "fn main() {}"), None);
    }

    #[test]
    fn exact_match_reports_line_and_column() {
        let doc = "ab\ncd ef\n";
        let pos = locate(Some("ef"), doc).unwrap();
        assert_eq!(pos, Position { line: 1, column: 3 });

        // Match on line 0: column equals the offset.
        let pos = locate(Some("cd"), "xy cd").unwrap();
        assert_eq!(pos, Position { line: 0, column: 3 });
    }

    #[test]
    fn collapsed_whitespace_still_matches() {
        let doc = "let a = 2;\nconst x = 1;\n";
        let pos = locate(Some("const   x = 1"), doc).unwrap();
        assert_eq!(pos, Position { line: 1, column: 0 });
    }

    #[test]
    fn rewrapped_multiline_snippet_matches() {
        let doc = "// header\nfn foo() {\n    bar();\n}\n";
        let pos = locate(Some("fn foo() { bar(); }"), doc).unwrap();
        assert_eq!(pos, Position { line: 1, column: 0 });
    }

    #[test]
    fn metacharacters_are_escaped() {
        let doc = "if (a.len() > 0) { return; }\n";
        let pos = locate(Some("(a.len() > 0)"), doc).unwrap();
        assert_eq!(pos.line, 0);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn short_unmatched_snippet_skips_fuzzy_pass() {
        // 15 chars or fewer: no anchor scan, straight to None.
        let doc = "completely unrelated text";
        assert_eq!(locate(Some("zzz qqq"), doc), None);
    }

    #[test]
    fn fuzzy_pass_finds_reordered_fragment() {
        // Exact pass fails (words are not contiguous in the document), but
        // "resolve", "user" and "token" co-occur within one window.
        let doc = "fn main() {\n    let t = resolve(user, token);\n}\n";
        let pos = locate(Some("resolve the user token quickly"), doc).unwrap();
        assert_eq!(pos.line, 1);
    }

    #[test]
    fn fuzzy_pass_rejects_scattered_words() {
        let filler = "x".repeat(200);
        let doc = format!("resolve\n{filler}\nuser\n{filler}\ntoken\n");
        assert_eq!(locate(Some("resolve the user token quickly"), &doc), None);
    }

    #[test]
    fn fuzzy_window_clips_at_document_start() {
        let doc = "userdata token here";
        // Anchor "userdata" sits at offset 0; the window must not underflow.
        let pos = locate(Some("userdata token something"), doc).unwrap();
        assert_eq!(pos, Position { line: 0, column: 0 });
    }

    #[test]
    fn single_significant_word_is_not_enough() {
        // Only one word survives the length filter, so no window can reach
        // the two-word threshold.
        let doc = "the important call site";
        assert_eq!(locate(Some("an important of to"), doc), None);
    }
}
