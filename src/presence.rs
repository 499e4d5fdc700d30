//! Presence channel: per-connection ephemeral state visible to peers.
//!
//! DESIGN
//! ======
//! - A presence record lives exactly as long as its connection. It is
//!   never written to the object store and never replayed to late
//!   joiners; a joiner learns a peer's presence from the peer's next
//!   patch.
//! - Patches are sparse and tri-state. A field that is absent on the
//!   wire keeps its current value, an explicit null clears it, and a
//!   value replaces it. Sparseness matters because cursor moves
//!   republish at pointer-move rate and must not clobber chat text.
//! - Each participant applies peer patches to a roster keyed by
//!   connection id and drops the entry when the peer leaves.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::CURSOR_COLORS;
use crate::shape::Point;
use crate::transport::ConnectionId;

// =============================================================================
// PATCH FIELDS
// =============================================================================

/// Tri-state patch slot: keep the current value, clear it, or set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// Leave the current value untouched. Absent on the wire.
    #[default]
    Keep,
    /// Clear the current value. Null on the wire.
    Clear,
    /// Replace the current value.
    Set(T),
}

impl<T> Field<T> {
    /// Whether this slot should be omitted from serialization.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Field::Keep)
    }

    /// Apply this slot to the value it patches.
    pub fn apply_to(&self, slot: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            Field::Keep => {}
            Field::Clear => *slot = None,
            Field::Set(value) => *slot = Some(value.clone()),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Keep | Field::Clear => serializer.serialize_none(),
            Field::Set(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Set(value),
            None => Field::Clear,
        })
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Ephemeral state one connection shows to its peers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Live cursor position, absent while the pointer is off-canvas.
    pub cursor: Option<Point>,
    /// Palette color peers paint this cursor with.
    pub cursor_color: Option<String>,
    /// In-progress cursor chat text.
    pub message: Option<String>,
}

/// Sparse update to the sender's presence record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresencePatch {
    #[serde(default, skip_serializing_if = "Field::is_keep")]
    pub cursor: Field<Point>,
    #[serde(default, skip_serializing_if = "Field::is_keep")]
    pub cursor_color: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_keep")]
    pub message: Field<String>,
}

// =============================================================================
// BUILDERS
// =============================================================================

impl PresencePatch {
    /// Patch that keeps every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: Point) -> Self {
        self.cursor = Field::Set(cursor);
        self
    }

    #[must_use]
    pub fn clear_cursor(mut self) -> Self {
        self.cursor = Field::Clear;
        self
    }

    #[must_use]
    pub fn with_cursor_color(mut self, color: impl Into<String>) -> Self {
        self.cursor_color = Field::Set(color.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Field::Set(message.into());
        self
    }

    #[must_use]
    pub fn clear_message(mut self) -> Self {
        self.message = Field::Clear;
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.is_keep() && self.cursor_color.is_keep() && self.message.is_keep()
    }
}

impl PresenceRecord {
    /// Apply a sparse patch to this record.
    pub fn apply(&mut self, patch: &PresencePatch) {
        patch.cursor.apply_to(&mut self.cursor);
        patch.cursor_color.apply_to(&mut self.cursor_color);
        patch.message.apply_to(&mut self.message);
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Palette color for a connection, stable for the connection's lifetime.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cursor_color_for(connection_id: ConnectionId) -> &'static str {
    CURSOR_COLORS[connection_id as usize % CURSOR_COLORS.len()]
}

/// Peer presence records, keyed by connection id.
#[derive(Debug, Default)]
pub struct Roster {
    peers: HashMap<ConnectionId, PresenceRecord>,
}

impl Roster {
    /// Empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a peer's patch, creating the record on first sight.
    pub fn apply(&mut self, from: ConnectionId, patch: &PresencePatch) {
        self.peers.entry(from).or_default().apply(patch);
    }

    /// Drop a peer's record once it leaves.
    pub fn remove(&mut self, from: ConnectionId) -> Option<PresenceRecord> {
        self.peers.remove(&from)
    }

    /// Presence record for one peer.
    #[must_use]
    pub fn get(&self, from: ConnectionId) -> Option<&PresenceRecord> {
        self.peers.get(&from)
    }

    /// All peer records ordered by connection id.
    #[must_use]
    pub fn others(&self) -> Vec<(ConnectionId, &PresenceRecord)> {
        let mut others: Vec<(ConnectionId, &PresenceRecord)> =
            self.peers.iter().map(|(id, rec)| (*id, rec)).collect();
        others.sort_by_key(|(id, _)| *id);
        others
    }

    /// Number of peers with a presence record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Returns `true` when no peer has a presence record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
