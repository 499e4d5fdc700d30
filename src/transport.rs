//! Delivery: the universal message type between room peers.
//!
//! ARCHITECTURE
//! ============
//! Every communication in a room is a Delivery. A session publishes
//! payloads through its `RoomTransport`, the room hub stamps the sender
//! and fans the delivery out to peer queues, and each session drains its
//! queue to apply remote effects.
//!
//! DESIGN
//! ======
//! - Three live channels ride one connection: `storage` (replicated
//!   ops), `presence` (cursor and chat state), and `event` (reaction
//!   bursts). `join` and `leave` mark membership changes.
//! - Storage deliveries are echoed to every peer, the sender included,
//!   so all replicas observe one authoritative op order. Presence and
//!   event deliveries skip the sender, which already applied the change
//!   locally.
//! - Presence and events are ephemeral: never persisted, never replayed
//!   to late joiners.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::presence::PresencePatch;
use crate::reaction::ReactionEvent;
use crate::store::StorageOp;

// =============================================================================
// TYPES
// =============================================================================

/// Identifier the room hub assigns to one connection for its lifetime.
pub type ConnectionId = u32;

/// One channel payload, tagged for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum Payload {
    /// Replicated mutation against the shared object store.
    Storage(StorageOp),
    /// Sparse update to the sender's presence record.
    Presence(PresencePatch),
    /// Fire-and-forget reaction burst.
    Event(ReactionEvent),
    /// The sender joined the room.
    Join,
    /// The sender left the room; its presence is gone.
    Leave,
}

impl Payload {
    /// Channel name for log lines and wire inspection.
    #[must_use]
    pub fn channel(&self) -> &'static str {
        match self {
            Payload::Storage(_) => "storage",
            Payload::Presence(_) => "presence",
            Payload::Event(_) => "event",
            Payload::Join => "join",
            Payload::Leave => "leave",
        }
    }
}

/// A payload stamped with its sender and send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// Connection that published the payload.
    pub from: ConnectionId,
    /// Milliseconds since Unix epoch. Set automatically at construction.
    pub ts: i64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Delivery {
    /// Stamp a payload for fan-out.
    #[must_use]
    pub fn new(from: ConnectionId, payload: Payload) -> Self {
        Self { from, ts: now_ms(), payload }
    }
}

/// Current time as milliseconds since Unix epoch.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for typed errors.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// One session's handle on a room.
///
/// Implementations carry the fan-out policy described in the module
/// docs. The trait is object-safe so sessions can hold any transport
/// and tests can substitute an in-process one.
#[async_trait::async_trait]
pub trait RoomTransport: Send + Sync {
    /// Identifier the room assigned to this connection.
    fn connection_id(&self) -> ConnectionId;

    /// Publish one payload to the room.
    async fn publish(&self, payload: Payload);

    /// Wait for the next delivery. Returns `None` once the room is gone
    /// and the queue is drained.
    async fn recv(&mut self) -> Option<Delivery>;

    /// Take the next delivery if one is already queued.
    fn try_recv(&mut self) -> Option<Delivery>;

    /// Leave the room. Peers observe a `leave` delivery and drop this
    /// connection's presence.
    async fn leave(&self);
}
