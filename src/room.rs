//! In-process room hub: authoritative replica plus delivery fan-out.
//!
//! DESIGN
//! ======
//! The hub owns the canonical object store and a map of peer queues.
//! Storage publishes are applied to the canonical store and fanned out
//! to every peer, sender included, while the write lock is held, so
//! every replica observes one authoritative op order. Presence and
//! event publishes skip the sender, which already applied the change
//! locally, and are never stored.
//!
//! Peer queues are unbounded: replicated ops must not be dropped, or
//! replicas diverge. A peer whose queue is gone (receiver dropped
//! without a leave) is pruned at the next fan-out and a leave is
//! synthesized on its behalf so rosters do not keep ghosts.
//!
//! LIFECYCLE
//! =========
//! 1. `join` assigns the next connection id, snapshots the canonical
//!    store, and announces a `join` delivery to existing peers.
//! 2. The session publishes payloads and drains its queue.
//! 3. `leave` removes the queue and announces a `leave` delivery; the
//!    drained queue then yields `None`.

#[cfg(test)]
#[path = "room_test.rs"]
mod room_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};

use crate::shape::{ObjectId, ShapeRecord};
use crate::store::ObjectStore;
use crate::transport::{ConnectionId, Delivery, Payload, RoomTransport};

// =============================================================================
// TYPES
// =============================================================================

/// Everything a fresh connection needs: its transport and the canonical
/// objects at join time.
pub struct RoomWelcome {
    pub transport: RoomHandle,
    pub snapshot: HashMap<ObjectId, ShapeRecord>,
}

/// Shared room: canonical store, peer queues, id allocator.
struct RoomState {
    store: ObjectStore,
    peers: HashMap<ConnectionId, mpsc::UnboundedSender<Delivery>>,
    next_connection: ConnectionId,
}

impl RoomState {
    fn new() -> Self {
        Self { store: ObjectStore::new(), peers: HashMap::new(), next_connection: 0 }
    }

    /// Queue a delivery to every peer except `exclude`. Peers whose
    /// queue is gone are dropped and a leave is synthesized for them.
    fn fan_out(&mut self, delivery: &Delivery, exclude: Option<ConnectionId>) {
        let mut dead: Vec<ConnectionId> = Vec::new();
        for (id, tx) in &self.peers {
            if exclude == Some(*id) {
                continue;
            }
            if tx.send(delivery.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            self.drop_peer(id);
        }
    }

    /// Remove a peer that vanished without leaving and tell the others.
    fn drop_peer(&mut self, id: ConnectionId) {
        if self.peers.remove(&id).is_none() {
            return;
        }
        warn!(connection_id = id, "room: pruned unreachable peer");
        let leave = Delivery::new(id, Payload::Leave);
        self.peers.retain(|_, tx| tx.send(leave.clone()).is_ok());
    }
}

// =============================================================================
// HUB
// =============================================================================

/// One shared drawing room. Clone handles are cheap and refer to the
/// same room.
#[derive(Clone)]
pub struct RoomHub {
    state: Arc<RwLock<RoomState>>,
}

impl RoomHub {
    /// Open an empty room.
    #[must_use]
    pub fn new() -> Self {
        Self { state: Arc::new(RwLock::new(RoomState::new())) }
    }

    /// Connect. Existing peers observe a `join` delivery; the caller
    /// gets a transport and the canonical objects to seed its replica.
    pub async fn join(&self) -> RoomWelcome {
        let mut state = self.state.write().await;
        let connection_id = state.next_connection;
        state.next_connection += 1;

        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = state.store.snapshot();
        state.peers.insert(connection_id, tx);

        let announce = Delivery::new(connection_id, Payload::Join);
        state.fan_out(&announce, Some(connection_id));
        info!(connection_id, peers = state.peers.len(), "room: connection joined");

        let transport = RoomHandle { connection_id, state: Arc::clone(&self.state), rx };
        RoomWelcome { transport, snapshot }
    }

    /// Canonical objects right now.
    pub async fn snapshot(&self) -> HashMap<ObjectId, ShapeRecord> {
        self.state.read().await.store.snapshot()
    }

    /// Connected peer count.
    pub async fn peer_count(&self) -> usize {
        self.state.read().await.peers.len()
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// One connection's end of a room. Implements the transport the session
/// drives.
pub struct RoomHandle {
    connection_id: ConnectionId,
    state: Arc<RwLock<RoomState>>,
    rx: mpsc::UnboundedReceiver<Delivery>,
}

#[async_trait::async_trait]
impl RoomTransport for RoomHandle {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    async fn publish(&self, payload: Payload) {
        let mut state = self.state.write().await;
        if let Payload::Storage(op) = &payload {
            state.store.apply(op.clone());
        }
        let exclude = match &payload {
            Payload::Storage(_) => None,
            _ => Some(self.connection_id),
        };
        let delivery = Delivery::new(self.connection_id, payload);
        state.fan_out(&delivery, exclude);
    }

    async fn recv(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    fn try_recv(&mut self) -> Option<Delivery> {
        match self.rx.try_recv() {
            Ok(delivery) => Some(delivery),
            Err(_) => None,
        }
    }

    async fn leave(&self) {
        let mut state = self.state.write().await;
        if state.peers.remove(&self.connection_id).is_some() {
            let delivery = Delivery::new(self.connection_id, Payload::Leave);
            state.fan_out(&delivery, Some(self.connection_id));
            info!(
                connection_id = self.connection_id,
                peers = state.peers.len(),
                "room: connection left"
            );
        }
    }
}
