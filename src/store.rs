//! Replicated object store: the shared map every peer converges toward.
//!
//! DESIGN
//! ======
//! - Whole-record writes. `put` replaces the record under its id with no
//!   field-level merge, so two peers racing on the same id converge to
//!   whichever write the room delivers last. Records are independent;
//!   writes to different ids never conflict.
//! - Change notification is pull-based. Every mutation bumps a revision
//!   counter in a watch channel; observers wake on the bump and read
//!   `snapshot` for the complete current map. Coalesced wakeups are
//!   fine because observers reconcile against the full map, never
//!   against individual deltas.
//! - `StorageOp` is the unit of replication. Local mutations are applied
//!   here optimistically and published as ops; remote ops arrive through
//!   the room and are applied verbatim.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::shape::{ObjectId, ShapeRecord};

// =============================================================================
// TYPES
// =============================================================================

/// A single replicated mutation against the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum StorageOp {
    /// Insert or fully replace the record under its id.
    Put { record: ShapeRecord },
    /// Remove the record under the id, if present.
    Delete { object_id: ObjectId },
    /// Remove every record.
    Clear,
}

/// In-memory replica of the shared shape map.
pub struct ObjectStore {
    objects: HashMap<ObjectId, ShapeRecord>,
    revision: watch::Sender<u64>,
}

// =============================================================================
// STORE
// =============================================================================

impl ObjectStore {
    /// Create an empty replica at revision zero.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self { objects: HashMap::new(), revision }
    }

    /// Return a reference to the record under an id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&ShapeRecord> {
        self.objects.get(id)
    }

    /// Insert or fully replace a record. Always counts as a change, even
    /// when the incoming record equals the stored one; value-equality
    /// suppression happens upstream in the mutator.
    pub fn put(&mut self, record: ShapeRecord) {
        self.objects.insert(record.object_id, record);
        self.touch();
    }

    /// Remove a record by id, returning it if it was present. A miss is
    /// not a change and wakes no observers.
    pub fn delete(&mut self, id: &ObjectId) -> Option<ShapeRecord> {
        let removed = self.objects.remove(id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Remove every record. A clear of an already-empty replica wakes no
    /// observers.
    pub fn clear(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        self.objects.clear();
        self.touch();
    }

    /// Apply one replicated op to this replica.
    pub fn apply(&mut self, op: StorageOp) {
        match op {
            StorageOp::Put { record } => self.put(record),
            StorageOp::Delete { object_id } => {
                self.delete(&object_id);
            }
            StorageOp::Clear => self.clear(),
        }
    }

    /// Clone of the complete current map.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<ObjectId, ShapeRecord> {
        self.objects.clone()
    }

    /// All records ordered by id, for deterministic iteration.
    #[must_use]
    pub fn records(&self) -> Vec<&ShapeRecord> {
        let mut records: Vec<&ShapeRecord> = self.objects.values().collect();
        records.sort_by_key(|rec| rec.object_id);
        records
    }

    /// Subscribe to change notifications. The receiver observes the
    /// revision counter; after a wakeup, read `snapshot` to reconcile.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision counter. Starts at zero, bumps on every change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Number of records currently in the replica.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the replica holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn touch(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
