//! Model-response parsing: structured payloads and freeform text.
//!
//! Strategy:
//! - Structured path: the payload is already per-entry shaped; validate each
//!   entry, resolve snippet positions, and keep going on bad entries.
//! - Freeform path: treat the text as an untrusted, partially-structured
//!   stream. One declarative line pattern with named capture groups decides
//!   what counts as a finding; everything else is skipped, never an error.
//!
//! Both paths end in the shared normalization (identity-key dedup + document
//! ordering), so callers always see a canonical list.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::findings::{Finding, Position, Severity, normalize};
use crate::llm::ReviewPayload;
use crate::resolve;

lazy_static! {
    /// Reasoning segments local models emit ahead of the answer.
    static ref REASONING: Regex = Regex::new(r"(?s)<think>.*?</think>").unwrap();

    /// One finding per line:
    /// `[SEVERITY] optional-colon message optional([Ln N, Col M])`.
    static ref FINDING_LINE: Regex = Regex::new(
        r"(?i)^\[(?P<sev>error|warning|info|hint)\]\s*:?\s*(?P<msg>.+?)\s*(?:\[ln\s*(?P<line>\d+)(?:\s*,\s*col\s*(?P<col>\d+))?\])?$",
    )
    .unwrap();

    /// Lines that are only a line-number label, e.g. `L10:` or `Line 10`.
    static ref LINE_LABEL: Regex = Regex::new(r"(?i)^(?:l|line\s*)\d+:?$").unwrap();
}

/// Remove `<think>…</think>` segments (non-greedy, may repeat or span lines).
pub fn strip_reasoning(text: &str) -> Cow<'_, str> {
    REASONING.replace_all(text, "")
}

/// Parse an already-structured review payload.
///
/// Per-entry validation only: an unrecognized or missing severity defaults to
/// `Info` with a warning, an empty message drops the entry. Positions come
/// from snippet resolution against `document_text`. Identity-key dedup is
/// still applied even though the payload is assumed well-formed.
pub fn parse_structured(payload: &ReviewPayload, document_text: &str) -> Vec<Finding> {
    let mut out = Vec::with_capacity(payload.reviews.len());
    for (idx, entry) in payload.reviews.iter().enumerate() {
        let message = entry.message.trim();
        if message.is_empty() {
            warn!("structured entry {idx} dropped: empty message");
            continue;
        }
        let severity = match entry.severity.as_deref().and_then(Severity::parse) {
            Some(sev) => sev,
            None => {
                warn!(
                    "structured entry {idx}: unrecognized severity {:?}, defaulting to Info",
                    entry.severity
                );
                Severity::Info
            }
        };
        let position = resolve::locate(entry.code_snippet.as_deref(), document_text);
        out.push(Finding {
            severity,
            message: message.to_string(),
            code_snippet: entry.code_snippet.clone(),
            position,
        });
    }
    normalize(out)
}

/// Parse a freeform text response.
///
/// Lines that do not look like findings are silently discarded. Explicit
/// inline `[Ln N, Col M]` hints are honored as-is (the line converted to
/// zero-based); no snippet resolution happens on this path.
pub fn parse_freeform(text: &str) -> Vec<Finding> {
    let cleaned = strip_reasoning(text);

    let mut out = Vec::new();
    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() || is_noise_line(line) {
            continue;
        }
        let line = strip_bullet(line);
        let Some(caps) = FINDING_LINE.captures(line) else {
            continue;
        };

        // The alternation admits only the four tokens; the fallback is
        // unreachable but keeps this path panic-free.
        let severity = Severity::parse(&caps["sev"]).unwrap_or(Severity::Info);
        let message = caps["msg"].trim().to_string();
        if message.is_empty() {
            continue;
        }
        let position = caps.name("line").map(|l| {
            let line_no: u32 = l.as_str().parse().unwrap_or(1);
            let column = caps
                .name("col")
                .and_then(|c| c.as_str().parse().ok())
                .unwrap_or(0);
            Position {
                line: line_no.saturating_sub(1),
                column,
            }
        });

        out.push(Finding {
            severity,
            message,
            code_snippet: None,
            position,
        });
    }

    debug!("freeform parse extracted {} raw findings", out.len());
    normalize(out)
}

/// Preambles, markup scaffolding, and bare line labels the model tends to
/// wrap its answers in.
fn is_noise_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    if lower.starts_with("here are") || lower.starts_with("below are") {
        return true;
    }
    if matches!(
        lower.trim_end_matches(':'),
        "review results" | "code review" | "findings"
    ) {
        return true;
    }
    if line.starts_with('#') || line.contains("```") || is_horizontal_rule(line) {
        return true;
    }
    LINE_LABEL.is_match(line)
}

fn is_horizontal_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '=' | '*' | '_'))
}

/// Strip one leading bullet or list marker (`-`, `*`, `+`, `•`, `1.`, `1)`).
fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "* ", "+ ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if rest.starts_with(' ') {
                return rest.trim_start();
            }
        }
    }
    line
}
