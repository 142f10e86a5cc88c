//! Ad-hoc, local-LLM code review for editors.
//!
//! Single pipeline, leaf-first:
//!
//! 1) **Request** — `session::ReviewSession` sends a document to a local
//!    Ollama-style endpoint. One review in flight at a time, per-document
//!    cooldown between repeats.
//! 2) **Extract** — `findings::parser` turns the raw response (strict JSON
//!    or freeform text) into canonical `Finding`s: severity classification,
//!    identity-key dedup, document ordering.
//! 3) **Locate** — `resolve` maps reported code snippets to zero-based
//!    positions, whitespace-tolerant first, fuzzy word anchors second.
//! 4) **Publish** — `store::ResultStore` replaces the document's entry
//!    wholesale and notifies observers; `diagnostics` shapes the records for
//!    the problems surface.
//!
//! The extract/locate/publish core is synchronous, allocation-bounded and
//! never fails: model noise degrades to fewer findings, not errors. Only the
//! network edge (`llm`, driven by `session`) returns `ReviewResult`.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod findings;
pub mod llm;
pub mod resolve;
pub mod session;
pub mod store;

pub use config::ReviewConfig;
pub use errors::{Error, ReviewResult};
pub use findings::{Finding, Position, Severity, SeverityCounts};
pub use session::{ReviewOutcome, ReviewSession};
pub use store::{ChangeEvent, ChangeKind, ResultStore};
