//! Visit bookkeeping shared by the graph traversals.

use std::collections::HashMap;
use std::hash::Hash;

/// State of a node during one traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Visit<T> {
    InProgress,
    Done(T),
}

/// Per-traversal memo keyed by node (or node pair).
#[derive(Debug)]
pub(crate) struct Memo<K, T> {
    entries: HashMap<K, Visit<T>>,
}

impl<K: Eq + Hash, T: Clone> Memo<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&Visit<T>> {
        self.entries.get(key)
    }

    pub(crate) fn enter(&mut self, key: K) {
        self.entries.insert(key, Visit::InProgress);
    }

    /// Record the result for `key` and hand it back.
    pub(crate) fn finish(&mut self, key: K, result: T) -> T {
        self.entries.insert(key, Visit::Done(result.clone()));
        result
    }
}
