//! Canonical finding model shared across the pipeline.
//!
//! Goals:
//! - One normalized record per reported issue: severity, message, optional
//!   source snippet, optional zero-based position.
//! - Deterministic identity keys so duplicates collapse the same way on
//!   every run.
//! - A single normalization step (dedup + document ordering) used by both
//!   parser paths.

pub mod parser;

use sha2::{Digest, Sha256};

/// Severity of a review finding. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Case-insensitive parse of the four wire tokens; `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            "hint" => Some(Severity::Hint),
            _ => None,
        }
    }

    /// Display rank (higher is more severe): Error > Warning > Info > Hint.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 4,
            Severity::Warning => 3,
            Severity::Info => 2,
            Severity::Hint => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
            Severity::Hint => "Hint",
        }
    }
}

/// Zero-based line/column inside a document.
///
/// "Could not be located" is expressed as `Option<Position>`, never as a
/// sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// One normalized review finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    /// Human-readable description; non-empty after trimming.
    pub message: String,
    /// Source fragment the model pointed at. Only ever used to derive
    /// `position`, never displayed as the message.
    pub code_snippet: Option<String>,
    pub position: Option<Position>,
}

impl Finding {
    /// Deterministic dedup key over `(severity, message, line, column)`,
    /// missing line/column hashed as `0`. The snippet does not participate:
    /// two findings that read the same at the same place are duplicates.
    pub fn identity_key(&self) -> String {
        let (line, column) = match self.position {
            Some(p) => (p.line, p.column),
            None => (0, 0),
        };
        let mut h = Sha256::new();
        h.update(self.severity.as_str().as_bytes());
        h.update([0u8]);
        h.update(self.message.as_bytes());
        h.update([0u8]);
        h.update(line.to_le_bytes());
        h.update(column.to_le_bytes());
        format!("{:x}", h.finalize())
    }
}

/// Dedup by identity key (first occurrence wins), then stable-sort into
/// document order: ascending line, positionless findings last.
pub fn normalize(mut findings: Vec<Finding>) -> Vec<Finding> {
    use std::collections::HashSet;
    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert(f.identity_key()));
    findings.sort_by_key(|f| match f.position {
        Some(p) => (0u8, p.line),
        None => (1u8, 0),
    });
    findings
}

/// Per-severity tallies for one document, used for badge rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub hints: usize,
}

impl SeverityCounts {
    pub fn tally(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
                Severity::Hint => counts.hints += 1,
            }
        }
        counts
    }

    pub fn total(self) -> usize {
        self.errors + self.warnings + self.infos + self.hints
    }
}
