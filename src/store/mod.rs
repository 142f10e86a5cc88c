//! Per-document finding registry.
//!
//! Owned mapping from document URI to its current findings. Updates replace
//! an entry wholesale; there is no merge. Every committed mutation recomputes
//! the aggregate count and synchronously notifies registered observers, so
//! the diagnostics and tree surfaces re-render exactly once per change.

use std::collections::HashMap;

use tracing::debug;

use crate::findings::{Finding, SeverityCounts};

/// What a committed mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Updated,
    Cleared,
}

/// Payload handed to observers after each committed mutation.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub uri: String,
    pub kind: ChangeKind,
    /// Total findings across all documents after the mutation.
    pub aggregate: usize,
}

/// Observer callback, invoked synchronously after a mutation is committed.
pub type ChangeListener = Box<dyn Fn(&ChangeEvent) + Send>;

/// Registry of findings keyed by document URI.
///
/// The store is the sole owner of the mapping; callers mutate it only
/// through `update`/`clear`. Iteration order over documents is the order of
/// each URI's first update, stable for the lifetime of the store.
#[derive(Default)]
pub struct ResultStore {
    entries: HashMap<String, Vec<Finding>>,
    /// URIs in first-update order.
    order: Vec<String>,
    aggregate: usize,
    listeners: Vec<ChangeListener>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for subsequent mutations.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    /// Wholesale replacement of `uri`'s findings. Notifies exactly once,
    /// after the replacement is committed, even when the content is
    /// identical to the previous state.
    pub fn update(&mut self, uri: &str, findings: Vec<Finding>) {
        if !self.entries.contains_key(uri) {
            self.order.push(uri.to_string());
        }
        self.entries.insert(uri.to_string(), findings);
        self.recount();
        debug!("store: updated {uri}, aggregate={}", self.aggregate);
        self.notify(uri, ChangeKind::Updated);
    }

    /// Remove the entry for `uri`. Silent no-op when it was never updated.
    pub fn clear(&mut self, uri: &str) {
        if self.entries.remove(uri).is_none() {
            return;
        }
        self.order.retain(|u| u != uri);
        self.recount();
        debug!("store: cleared {uri}, aggregate={}", self.aggregate);
        self.notify(uri, ChangeKind::Cleared);
    }

    /// Current findings for `uri`, empty when absent.
    pub fn get(&self, uri: &str) -> &[Finding] {
        self.entries.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(uri, findings)` pairs in first-update order.
    pub fn all_entries(&self) -> impl Iterator<Item = (&str, &[Finding])> {
        self.order.iter().map(|uri| (uri.as_str(), self.get(uri)))
    }

    /// Total findings across all documents.
    pub fn aggregate_count(&self) -> usize {
        self.aggregate
    }

    /// Number of documents currently tracked.
    pub fn document_count(&self) -> usize {
        self.order.len()
    }

    /// Per-severity tallies for one document, for badge rendering.
    pub fn counts_for(&self, uri: &str) -> SeverityCounts {
        SeverityCounts::tally(self.get(uri))
    }

    fn recount(&mut self) {
        self.aggregate = self.entries.values().map(Vec::len).sum();
    }

    fn notify(&self, uri: &str, kind: ChangeKind) {
        let event = ChangeEvent {
            uri: uri.to_string(),
            kind,
            aggregate: self.aggregate,
        };
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::{Position, Severity};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn finding(message: &str, line: Option<u32>) -> Finding {
        Finding {
            severity: Severity::Warning,
            message: message.to_string(),
            code_snippet: None,
            position: line.map(|line| Position { line, column: 0 }),
        }
    }

    #[test]
    fn update_then_get_round_trips() {
        let mut store = ResultStore::new();
        let findings = vec![finding("a", Some(1)), finding("b", None)];
        store.update("file:///a.rs", findings.clone());
        assert_eq!(store.get("file:///a.rs"), findings.as_slice());
        assert_eq!(store.aggregate_count(), 2);
    }

    #[test]
    fn get_on_unknown_uri_is_empty() {
        let store = ResultStore::new();
        assert!(store.get("file:///nope.rs").is_empty());
    }

    #[test]
    fn clear_removes_entry_and_recounts() {
        let mut store = ResultStore::new();
        store.update("file:///a.rs", vec![finding("a", None)]);
        store.update("file:///b.rs", vec![finding("b", None)]);
        store.clear("file:///a.rs");
        assert!(store.get("file:///a.rs").is_empty());
        assert_eq!(store.aggregate_count(), 1);
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn clear_on_unknown_uri_is_silent() {
        let mut store = ResultStore::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.clear("file:///never-updated.rs");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn identical_updates_notify_each_time() {
        let mut store = ResultStore::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let findings = vec![finding("same", Some(3))];
        store.update("file:///a.rs", findings.clone());
        store.update("file:///a.rs", findings);
        // Two calls, two notifications; state identical after each.
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(store.aggregate_count(), 1);
    }

    #[test]
    fn events_carry_kind_and_aggregate() {
        let mut store = ResultStore::new();
        let last = Arc::new(std::sync::Mutex::new(None));
        let sink = Arc::clone(&last);
        store.subscribe(Box::new(move |e| {
            *sink.lock().unwrap() = Some((e.uri.clone(), e.kind, e.aggregate));
        }));

        store.update("file:///a.rs", vec![finding("a", None), finding("b", None)]);
        assert_eq!(
            last.lock().unwrap().clone(),
            Some(("file:///a.rs".to_string(), ChangeKind::Updated, 2))
        );

        store.clear("file:///a.rs");
        assert_eq!(
            last.lock().unwrap().clone(),
            Some(("file:///a.rs".to_string(), ChangeKind::Cleared, 0))
        );
    }

    #[test]
    fn entries_iterate_in_first_update_order() {
        let mut store = ResultStore::new();
        store.update("file:///b.rs", vec![finding("b", None)]);
        store.update("file:///a.rs", vec![finding("a", None)]);
        // Replacing an existing entry must not move it.
        store.update("file:///b.rs", vec![finding("b2", None)]);

        let uris: Vec<&str> = store.all_entries().map(|(uri, _)| uri).collect();
        assert_eq!(uris, vec!["file:///b.rs", "file:///a.rs"]);
    }

    #[test]
    fn counts_for_feeds_badges() {
        let mut store = ResultStore::new();
        store.update(
            "file:///a.rs",
            vec![
                Finding {
                    severity: Severity::Error,
                    message: "e".into(),
                    code_snippet: None,
                    position: None,
                },
                finding("w", None),
            ],
        );
        let counts = store.counts_for("file:///a.rs");
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.total(), 2);
    }
}
