//! Memo shared by existence checks within one top-level operation

use depot_storage::RepositoryKey;
use std::collections::HashMap;

/// Per-repository answer recorded during a subtree walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// Not present (unknown) in the memo
    Unknown,
    /// Already visited: a group on the current walk, or a subtree without the artifact
    Visited,
    /// The artifact exists at or below this repository
    Found,
}

/// Repository key (`storage:repository`) → found flag
///
/// `false` means "visited, nothing found (yet)": a group is entered with
/// `false` before its members are walked, which also breaks membership
/// cycles. `true` short-circuits every later lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceMemo {
    entries: HashMap<String, bool>,
}

impl ExistenceMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &RepositoryKey) -> MemoState {
        match self.entries.get(&key.to_string()) {
            None => MemoState::Unknown,
            Some(false) => MemoState::Visited,
            Some(true) => MemoState::Found,
        }
    }

    pub fn mark_visited(&mut self, key: &RepositoryKey) {
        self.entries.entry(key.to_string()).or_insert(false);
    }

    pub fn mark_found(&mut self, key: &RepositoryKey) {
        self.entries.insert(key.to_string(), true);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw view (`storage:repository` → found)
    pub fn as_map(&self) -> &HashMap<String, bool> {
        &self.entries
    }
}
