//! Undo/redo coordinator: a per-participant history of local store
//! mutations.
//!
//! DESIGN
//! ======
//! - Entries are strictly local. They are never shared, never persisted,
//!   and bound in depth with the oldest evicted first.
//! - An entry captures the before and after state of one id at commit
//!   time. `None` on either side encodes creation and deletion.
//! - Undo must not clobber a peer. Before re-applying an entry's before
//!   state, the coordinator compares the store's current record against
//!   the after state it recorded at commit time; on divergence the entry
//!   is discarded silently and nothing is applied. Redo runs the same
//!   check against the before state.
//! - The caller applies the returned op to the store and publishes it,
//!   without committing it back into history.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::warn;

use crate::consts::HISTORY_DEPTH;
use crate::shape::{ObjectId, ShapeRecord};
use crate::store::{ObjectStore, StorageOp};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone)]
struct HistoryEntry {
    object_id: ObjectId,
    before: Option<ShapeRecord>,
    after: Option<ShapeRecord>,
}

/// Bounded undo/redo stacks for one participant.
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: VecDeque<HistoryEntry>,
    depth: usize,
}

// =============================================================================
// COORDINATOR
// =============================================================================

impl History {
    /// Empty history with the default depth bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(HISTORY_DEPTH)
    }

    /// Empty history bound to the given depth.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self { undo: VecDeque::new(), redo: VecDeque::new(), depth }
    }

    /// Record one committed local mutation.
    ///
    /// A commit that records no change would undo to a no-op, so it is
    /// skipped without touching either stack. Every real commit clears
    /// the redo stack.
    pub fn commit(
        &mut self,
        object_id: ObjectId,
        before: Option<ShapeRecord>,
        after: Option<ShapeRecord>,
    ) {
        if before == after {
            return;
        }
        self.redo.clear();
        self.undo.push_back(HistoryEntry { object_id, before, after });
        if self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    /// Roll back the most recent local mutation.
    ///
    /// Returns the op that restores the entry's before state, or `None`
    /// when the stack is empty or the entry went stale under a peer's
    /// later write. A stale entry is dropped; the next call moves on to
    /// the entry beneath it.
    pub fn undo(&mut self, store: &ObjectStore) -> Option<StorageOp> {
        let entry = self.undo.pop_back()?;
        if store.get(&entry.object_id) != entry.after.as_ref() {
            warn!(object_id = %entry.object_id, "history: stale undo entry discarded");
            return None;
        }
        let op = match &entry.before {
            Some(record) => StorageOp::Put { record: record.clone() },
            None => StorageOp::Delete { object_id: entry.object_id },
        };
        self.redo.push_back(entry);
        Some(op)
    }

    /// Roll the most recently undone mutation forward again.
    ///
    /// Symmetric to `undo`: the store's current record must still match
    /// the entry's before state, otherwise the entry is dropped.
    pub fn redo(&mut self, store: &ObjectStore) -> Option<StorageOp> {
        let entry = self.redo.pop_back()?;
        if store.get(&entry.object_id) != entry.before.as_ref() {
            warn!(object_id = %entry.object_id, "history: stale redo entry discarded");
            return None;
        }
        let op = match &entry.after {
            Some(record) => StorageOp::Put { record: record.clone() },
            None => StorageOp::Delete { object_id: entry.object_id },
        };
        self.undo.push_back(entry);
        Some(op)
    }

    /// Drop every entry on both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of entries available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of entries available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
