//! In-memory collection store
//!
//! [`SessionState`] is an immutable value; every change goes through
//! [`SessionState::apply`], which returns the next state. [`CollectionStore`]
//! holds the current state behind an `Arc` and swaps in the next one under a
//! single lock, so a snapshot is always a complete state.

use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::entry::{Entry, EntryPatch};

/// Whole session: the collection plus transient status flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Newest first
    pub entries: Vec<Entry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Every transition the session can go through
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    BatchStarted,
    BatchCommitted(Vec<Entry>),
    BatchFailed(String),
    EntryPatched { id: Uuid, patch: EntryPatch },
    Cleared,
}

impl SessionState {
    pub fn apply(&self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::BatchStarted => SessionState {
                entries: self.entries.clone(),
                is_loading: true,
                error: None,
            },
            SessionEvent::BatchCommitted(batch) => {
                let mut entries = batch;
                entries.extend(self.entries.iter().cloned());
                SessionState {
                    entries,
                    is_loading: false,
                    error: None,
                }
            }
            SessionEvent::BatchFailed(message) => SessionState {
                entries: self.entries.clone(),
                is_loading: false,
                error: Some(message),
            },
            SessionEvent::EntryPatched { id, patch } => SessionState {
                entries: self
                    .entries
                    .iter()
                    .map(|e| if e.id() == id { e.patched(&patch) } else { e.clone() })
                    .collect(),
                is_loading: self.is_loading,
                error: self.error.clone(),
            },
            SessionEvent::Cleared => SessionState {
                entries: Vec::new(),
                is_loading: self.is_loading,
                error: self.error.clone(),
            },
        }
    }

    pub fn find(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared owner of the session state
#[derive(Debug, Default)]
pub struct CollectionStore {
    state: Mutex<Arc<SessionState>>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. The returned value never changes underneath the caller.
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.lock().clone()
    }

    /// Apply one event and return the resulting state
    pub fn dispatch(&self, event: SessionEvent) -> Arc<SessionState> {
        let mut current = self.lock();
        let next = Arc::new(current.apply(event));
        *current = next.clone();
        next
    }

    /// Mark a batch in flight. Returns `false` if one already is.
    pub fn begin_batch(&self) -> bool {
        let mut current = self.lock();
        if current.is_loading {
            return false;
        }
        *current = Arc::new(current.apply(SessionEvent::BatchStarted));
        true
    }

    pub fn prepend_batch(&self, entries: Vec<Entry>) -> Arc<SessionState> {
        self.dispatch(SessionEvent::BatchCommitted(entries))
    }

    pub fn fail_batch(&self, message: impl Into<String>) -> Arc<SessionState> {
        self.dispatch(SessionEvent::BatchFailed(message.into()))
    }

    pub fn patch_entry(&self, id: Uuid, patch: EntryPatch) -> Arc<SessionState> {
        self.dispatch(SessionEvent::EntryPatched { id, patch })
    }

    pub fn clear(&self) -> Arc<SessionState> {
        self.dispatch(SessionEvent::Cleared)
    }

    fn lock(&self) -> MutexGuard<'_, Arc<SessionState>> {
        // State is replaced wholesale, so a poisoned lock still holds a consistent value
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::*;

    #[test]
    fn test_new_store_is_empty_and_idle() {
        let store = CollectionStore::new();
        let state = store.snapshot();
        assert!(state.is_empty());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_batches_prepend_newest_first() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("a1"), entry("a2")]);
        store.prepend_batch(vec![entry("b1"), entry("b2"), entry("b3")]);

        let names: Vec<_> = store
            .snapshot()
            .entries
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["b1", "b2", "b3", "a1", "a2"]);
    }

    #[test]
    fn test_commit_clears_loading_and_error() {
        let store = CollectionStore::new();
        store.fail_batch("boom");
        assert!(store.begin_batch());
        assert!(store.snapshot().error.is_none());

        let state = store.prepend_batch(vec![entry("x")]);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_begin_batch_refuses_while_loading() {
        let store = CollectionStore::new();
        assert!(store.begin_batch());
        assert!(!store.begin_batch());
        store.fail_batch("nope");
        assert!(store.begin_batch());
    }

    #[test]
    fn test_failure_keeps_collection() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("keep1"), entry("keep2")]);
        let before = store.snapshot();

        store.begin_batch();
        let after = store.fail_batch("text generation failed");

        assert_eq!(after.entries, before.entries);
        assert_eq!(after.error.as_deref(), Some("text generation failed"));
        assert!(!after.is_loading);
    }

    #[test]
    fn test_patch_touches_only_target() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("one"), entry("two"), entry("three")]);
        let before = store.snapshot();
        let target = before.entries[1].id();

        let after = store.patch_entry(target, EntryPatch::sheet_attached("data:image/png;base64,QQ=="));

        assert_eq!(after.entries[0], before.entries[0]);
        assert_eq!(after.entries[2], before.entries[2]);
        assert_eq!(
            after.find(target).unwrap().model_sheet_url(),
            Some("data:image/png;base64,QQ==")
        );
    }

    #[test]
    fn test_patch_unknown_id_changes_nothing() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("solo")]);
        let before = store.snapshot();

        let after = store.patch_entry(Uuid::new_v4(), EntryPatch::loading());
        assert_eq!(*after, *before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("a"), entry("b")]);

        let once = store.clear();
        let twice = store.clear();
        assert!(once.is_empty());
        assert_eq!(*once, *twice);
    }

    #[test]
    fn test_snapshot_is_stable_across_later_writes() {
        let store = CollectionStore::new();
        store.prepend_batch(vec![entry("old")]);
        let snapshot = store.snapshot();

        store.prepend_batch(vec![entry("new")]);
        store.clear();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries[0].name(), "old");
    }
}
