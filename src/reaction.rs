//! Reaction channel: ephemeral emoji bursts with a short lifetime.
//!
//! DESIGN
//! ======
//! - Fire and forget. A burst is broadcast once, never persisted, and
//!   never replayed; a late joiner sees only bursts sent after it
//!   arrived.
//! - Expiry runs on a periodic sweep rather than per-frame checks, so a
//!   burst can outlive its TTL by at most one sweep interval.
//! - The display list is receiver-local. Each participant stamps arrival
//!   against its own clock, so expiry never depends on cross-machine
//!   clock agreement; the wire timestamp is for display ordering only.

#[cfg(test)]
#[path = "reaction_test.rs"]
mod reaction_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::shape::Point;

// =============================================================================
// TYPES
// =============================================================================

/// One reaction burst as broadcast to the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Canvas position where the burst appears.
    pub point: Point,
    /// Emoji the burst displays.
    pub value: String,
    /// Sender's send time in milliseconds since Unix epoch.
    pub ts: i64,
}

impl ReactionEvent {
    /// Burst of the given emoji at a canvas position, stamped now.
    #[must_use]
    pub fn new(point: Point, value: impl Into<String>) -> Self {
        Self { point, value: value.into(), ts: crate::transport::now_ms() }
    }
}

#[derive(Debug, Clone)]
struct TimedReaction {
    event: ReactionEvent,
    seen_at: Instant,
}

/// Receiver-local display list of live reaction bursts.
#[derive(Debug)]
pub struct ReactionList {
    entries: Vec<TimedReaction>,
    ttl: Duration,
}

// =============================================================================
// DISPLAY LIST
// =============================================================================

impl ReactionList {
    /// Empty list whose entries live for `ttl` after arrival.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { entries: Vec::new(), ttl }
    }

    /// Admit a burst, stamping it with the local arrival time.
    pub fn insert(&mut self, event: ReactionEvent, seen_at: Instant) {
        self.entries.push(TimedReaction { event, seen_at });
    }

    /// Drop every entry whose lifetime has elapsed. An entry expires at
    /// exactly `seen_at + ttl`.
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|entry| entry.seen_at + self.ttl > now);
    }

    /// Live bursts in arrival order.
    pub fn visible(&self) -> impl Iterator<Item = &ReactionEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    /// Number of live bursts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no burst is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
