//! Mapping findings onto the editor diagnostics surface.
//!
//! Every finding is emitted: locatable findings become single-line spans at
//! their position, unlocatable ones anchor at the start of the document so
//! nothing silently disappears from the problems list.

use crate::findings::{Finding, Position, Severity};

/// Single-line span, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// One record for the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub span: Span,
    pub severity: Severity,
    pub message: String,
    /// Tool tag shown next to the message in the problems list.
    pub source: String,
}

/// Map `findings` to sink records against `document_text`.
pub fn to_records(findings: &[Finding], document_text: &str, source: &str) -> Vec<DiagnosticRecord> {
    findings
        .iter()
        .map(|f| DiagnosticRecord {
            span: span_for(f.position, document_text),
            severity: f.severity,
            message: f.message.clone(),
            source: source.to_string(),
        })
        .collect()
}

/// Single-line span at `position`, extended to the end of that line when the
/// document has one. Findings without a position anchor at document start.
fn span_for(position: Option<Position>, document_text: &str) -> Span {
    let start = position.unwrap_or_default();
    let line_len = document_text
        .lines()
        .nth(start.line as usize)
        .map(|l| l.len() as u32)
        .unwrap_or(start.column);
    Span {
        start,
        end: Position {
            line: start.line,
            column: line_len.max(start.column),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(message: &str, position: Option<Position>) -> Finding {
        Finding {
            severity: Severity::Error,
            message: message.to_string(),
            code_snippet: None,
            position,
        }
    }

    #[test]
    fn positioned_finding_spans_to_line_end() {
        let doc = "short\na longer line here\n";
        let records = to_records(
            &[finding("m", Some(Position { line: 1, column: 2 }))],
            doc,
            "ai-review",
        );
        assert_eq!(records[0].span.start, Position { line: 1, column: 2 });
        assert_eq!(records[0].span.end, Position { line: 1, column: 18 });
        assert_eq!(records[0].source, "ai-review");
    }

    #[test]
    fn positionless_finding_anchors_at_document_start() {
        let doc = "fn main() {}\n";
        let records = to_records(&[finding("m", None)], doc, "ai-review");
        assert_eq!(records[0].span.start, Position { line: 0, column: 0 });
        assert_eq!(records[0].span.end, Position { line: 0, column: 12 });
    }

    #[test]
    fn out_of_range_line_degrades_to_zero_width() {
        let records = to_records(
            &[finding("m", Some(Position { line: 99, column: 5 }))],
            "one line",
            "ai-review",
        );
        // No such line in the document: keep the reported start, zero width.
        assert_eq!(records[0].span.start, records[0].span.end);
    }

    #[test]
    fn no_finding_is_dropped() {
        let findings = vec![finding("a", None), finding("b", Some(Position::default()))];
        assert_eq!(to_records(&findings, "", "tag").len(), 2);
    }
}
