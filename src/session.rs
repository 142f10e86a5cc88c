//! Review orchestration.
//!
//! Flow per document:
//! 1) cooldown gate (per-URI, time-based);
//! 2) prompt build + model call;
//! 3) response routing: structured JSON parse, freeform fallback;
//! 4) wholesale store update + observer notification.
//!
//! Sequencing: callers drive the session through `&mut self`, so at most one
//! review is in flight at a time. Upstream failures propagate before the
//! store is touched; a failed request never disturbs previously published
//! findings. Once the extraction core runs it always runs to completion.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ReviewConfig;
use crate::errors::ReviewResult;
use crate::findings::{Finding, parser};
use crate::llm::{LlmClient, ReviewPayload, cleanup_json_like};
use crate::store::ResultStore;

/// What a review round did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Findings were published; carries the count.
    Completed(usize),
    /// The per-document cooldown window is still open; nothing ran.
    OnCooldown,
}

/// One editor session's review driver. Owns the model client, the result
/// store, and the per-document cooldown clock.
pub struct ReviewSession {
    client: LlmClient,
    store: ResultStore,
    cfg: ReviewConfig,
    last_review: HashMap<String, Instant>,
}

impl ReviewSession {
    pub fn new(cfg: ReviewConfig) -> Self {
        let client = LlmClient::new(cfg.model.clone());
        Self {
            client,
            store: ResultStore::new(),
            cfg,
            last_review: HashMap::new(),
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Mutable store access, e.g. for `subscribe` at session setup.
    pub fn store_mut(&mut self) -> &mut ResultStore {
        &mut self.store
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.cfg
    }

    /// Best-effort model warmup; call once at session start.
    pub async fn warmup(&self) {
        self.client.warmup().await;
    }

    /// Run one full review round for a document.
    ///
    /// Repeat requests inside the cooldown window return `OnCooldown`
    /// without calling the model or touching the store. Each completed call
    /// is independent and idempotent given the same input.
    pub async fn review_document(
        &mut self,
        uri: &str,
        document_text: &str,
    ) -> ReviewResult<ReviewOutcome> {
        if self.on_cooldown(uri) {
            debug!("review: {uri} still cooling down, skipped");
            return Ok(ReviewOutcome::OnCooldown);
        }

        let t0 = Instant::now();
        debug!("review: requesting model for {uri}");
        let prompt = build_review_prompt(uri, document_text);
        let raw = self.client.generate_raw(&prompt).await?;
        debug!("review: response received ({} chars)", raw.len());

        let findings = extract_findings(&raw, document_text);
        let count = findings.len();
        self.store.update(uri, findings);
        self.last_review.insert(uri.to_string(), Instant::now());

        info!(
            "review: {uri} done, findings={count} in {} ms",
            t0.elapsed().as_millis()
        );
        Ok(ReviewOutcome::Completed(count))
    }

    /// Drop published findings for a closed document.
    pub fn clear_document(&mut self, uri: &str) {
        self.store.clear(uri);
    }

    fn on_cooldown(&self, uri: &str) -> bool {
        self.last_review
            .get(uri)
            .is_some_and(|t| t.elapsed() < self.cfg.cooldown)
    }
}

/// Route a raw model response into findings: structured first, freeform
/// otherwise. Never fails; unusable responses yield an empty list.
pub fn extract_findings(raw: &str, document_text: &str) -> Vec<Finding> {
    let visible = parser::strip_reasoning(raw);
    let clean = cleanup_json_like(&visible);
    match serde_json::from_str::<ReviewPayload>(&clean) {
        Ok(payload) => {
            debug!(
                "review: structured payload, entries={}",
                payload.reviews.len()
            );
            parser::parse_structured(&payload, document_text)
        }
        Err(err) => {
            warn!("review: response is not structured JSON ({err}); using freeform parse");
            parser::parse_freeform(&visible)
        }
    }
}

/// Compact review prompt; asks for the strict JSON shape first, so the
/// freeform path stays a fallback.
fn build_review_prompt(path: &str, code: &str) -> String {
    let mut s = String::new();
    s.push_str("You are a code review assistant. Review the file below for correctness, potential bugs, performance, and readability.\n");
    s.push_str("\nReturn ONLY JSON with this exact shape (no markdown, no comments):\n");
    s.push_str("{\"reviews\": [{\"severity\": \"ERROR|WARNING|INFO|HINT\", \"message\": \"...\", \"codeSnippet\": \"...\"}]}\n");
    s.push_str("\nRules:\n- severity is one of ERROR, WARNING, INFO, HINT.\n");
    s.push_str("- codeSnippet is a short verbatim fragment from the file the finding refers to; omit it when not applicable.\n");
    s.push_str("- Return {\"reviews\": []} when there is nothing to report.\n");
    s.push_str(&format!("\n# File: {path}\n```code\n"));
    s.push_str(code);
    s.push_str("\n```\n");
    s
}
