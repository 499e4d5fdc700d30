//! One participant's connection to a shared drawing room.
//!
//! ARCHITECTURE
//! ============
//! The session owns every per-client moving part: the replica of the
//! shared store, the scene mirror, the undo history, the cursor state
//! machine, the peer roster, the reaction list, and the notice center.
//! Input flows in from the embedder (pointer, keys, tool clicks) and
//! from the render surface (selection, finished gestures); mutations
//! flow out as storage ops, presence patches, and reaction events
//! through the room transport.
//!
//! Local storage mutations are applied optimistically and also echoed
//! back by the room in authoritative order. Every storage delivery is
//! re-applied on arrival, own echoes included, so replicas that raced
//! settle on the room's order.
//!
//! LIFECYCLE
//! =========
//! 1. `connect` seeds the replica from the join snapshot and announces
//!    this cursor's palette color.
//! 2. The embedder feeds input and either drives `run` on a task or
//!    calls `pump` from its own loop.
//! 3. `leave` departs the room; peers drop this presence.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::consts::{
    HISTORY_DEPTH, NOTICE_TTL_MS, PASTE_OFFSET, REACTION_SAMPLE_INTERVAL_MS,
    REACTION_SWEEP_INTERVAL_MS, REACTION_TTL_MS,
};
use crate::cursor::{CursorMachine, CursorMode};
use crate::export::{ExportedDocument, export_document};
use crate::factory::{self, ImageDecodeError, ImageDecoder};
use crate::history::History;
use crate::input::{DrawGesture, Key, Modifiers, Selection, SurfaceEvent, Tool};
use crate::mutator::{self, Direction, ShapeEdit};
use crate::notice::{Clipboard, NoticeCenter, NoticeLevel};
use crate::presence::{PresencePatch, PresenceRecord, Roster, cursor_color_for};
use crate::reaction::{ReactionEvent, ReactionList};
use crate::scene::{RenderSurface, Scene};
use crate::shape::{ObjectId, Point, ShapeKind, ShapeRecord};
use crate::store::{ObjectStore, StorageOp};
use crate::transport::{ConnectionId, Delivery, ErrorCode, Payload, RoomTransport};

// =============================================================================
// CONFIG
// =============================================================================

/// Tunable session timings, overridable from the environment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub reaction_ttl_ms: u64,
    pub reaction_sample_interval_ms: u64,
    pub reaction_sweep_interval_ms: u64,
    pub notice_ttl_ms: u64,
    pub history_depth: usize,
}

impl SessionConfig {
    /// Stock timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reaction_ttl_ms: REACTION_TTL_MS,
            reaction_sample_interval_ms: REACTION_SAMPLE_INTERVAL_MS,
            reaction_sweep_interval_ms: REACTION_SWEEP_INTERVAL_MS,
            notice_ttl_ms: NOTICE_TTL_MS,
            history_depth: HISTORY_DEPTH,
        }
    }

    /// Stock timings with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            reaction_ttl_ms: env_parse("REACTION_TTL_MS", REACTION_TTL_MS),
            reaction_sample_interval_ms: env_parse(
                "REACTION_SAMPLE_INTERVAL_MS",
                REACTION_SAMPLE_INTERVAL_MS,
            ),
            reaction_sweep_interval_ms: env_parse(
                "REACTION_SWEEP_INTERVAL_MS",
                REACTION_SWEEP_INTERVAL_MS,
            ),
            notice_ttl_ms: env_parse("NOTICE_TTL_MS", NOTICE_TTL_MS),
            history_depth: env_parse("HISTORY_DEPTH", HISTORY_DEPTH),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an env var, falling back to the default when unset or invalid.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or(default),
        Err(_) => default,
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// A connected participant. One per client.
pub struct Session {
    transport: Box<dyn RoomTransport>,
    surface: Box<dyn RenderSurface>,
    store: ObjectStore,
    scene: Scene,
    history: History,
    cursor: CursorMachine,
    roster: Roster,
    reactions: ReactionList,
    notices: NoticeCenter,
    clipboard: Option<Box<dyn Clipboard>>,
    image_decoder: Option<Box<dyn ImageDecoder>>,
    me: PresenceRecord,
    tool: Tool,
    selection: Selection,
    gesture: DrawGesture,
    copy_buffer: Vec<ShapeRecord>,
    /// Shape under live surface manipulation; reconciliation skips it.
    in_flight: Option<ObjectId>,
    config: SessionConfig,
}

impl Session {
    /// Enter a room: seed the replica from the join snapshot, paint it,
    /// and announce this cursor's palette color.
    pub async fn connect(
        transport: Box<dyn RoomTransport>,
        snapshot: HashMap<ObjectId, ShapeRecord>,
        surface: Box<dyn RenderSurface>,
        config: SessionConfig,
    ) -> Self {
        let mut store = ObjectStore::new();
        for record in snapshot.into_values() {
            store.put(record);
        }
        let color = cursor_color_for(transport.connection_id());

        let mut session = Self {
            transport,
            surface,
            store,
            scene: Scene::new(),
            history: History::with_depth(config.history_depth),
            cursor: CursorMachine::new(),
            roster: Roster::new(),
            reactions: ReactionList::new(Duration::from_millis(config.reaction_ttl_ms)),
            notices: NoticeCenter::with_ttl(Duration::from_millis(config.notice_ttl_ms)),
            clipboard: None,
            image_decoder: None,
            me: PresenceRecord::default(),
            tool: Tool::Select,
            selection: Selection::None,
            gesture: DrawGesture::Idle,
            copy_buffer: Vec::new(),
            in_flight: None,
            config,
        };
        session.sync_scene();
        session
            .publish_presence(PresencePatch::new().with_cursor_color(color))
            .await;
        info!(
            connection_id = session.transport.connection_id(),
            shapes = session.store.len(),
            "session: connected"
        );
        session
    }

    /// Install the host clipboard.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = Some(clipboard);
    }

    /// Install the platform image decoder.
    pub fn set_image_decoder(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.image_decoder = Some(decoder);
    }

    // =========================================================================
    // TOOLS
    // =========================================================================

    /// React to a toolbar selection. Momentary tools act once and fall
    /// back to the selection tool.
    pub async fn activate_tool(&mut self, tool: Tool) {
        match tool {
            Tool::Delete => {
                self.delete_selection().await;
                self.tool = Tool::Select;
            }
            Tool::Reset => {
                self.clear_canvas().await;
                self.tool = Tool::Select;
            }
            _ => self.tool = tool,
        }
        let freehand = self.tool == Tool::Freeform;
        self.surface.set_freehand(freehand);
        self.gesture = if freehand { DrawGesture::Freehand } else { DrawGesture::Idle };
    }

    // =========================================================================
    // POINTER
    // =========================================================================

    /// Pointer pressed on the canvas.
    pub async fn pointer_down(&mut self, at: Point) {
        self.cursor.pointer_down();
        self.publish_presence(PresencePatch::new().with_cursor(at)).await;

        if matches!(self.gesture, DrawGesture::Freehand) {
            return;
        }
        let Some(kind) = self.tool.shape_kind() else {
            return;
        };
        let Some(record) = factory::create_shape(kind, at) else {
            return;
        };
        let id = record.object_id;
        self.publish_op(StorageOp::Put { record }).await;
        self.sync_scene();
        self.gesture = DrawGesture::Sizing { id, anchor: at };
    }

    /// Pointer moved over the canvas.
    ///
    /// The cursor republishes on every move except while the reaction
    /// selector is open, where the cursor holds its last position until
    /// it is first seeded.
    pub async fn pointer_move(&mut self, at: Point) {
        if self.me.cursor.is_none() || !self.cursor.suppresses_cursor() {
            self.publish_presence(PresencePatch::new().with_cursor(at)).await;
        }
        self.size_gesture(at).await;
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, _at: Point) {
        self.cursor.pointer_up();
        if let DrawGesture::Sizing { id, .. } = self.gesture {
            self.history.commit(id, None, self.store.get(&id).cloned());
            self.gesture = DrawGesture::Idle;
            self.tool = Tool::Select;
        }
    }

    /// Pointer left the canvas; cursor and chat bubble disappear for
    /// peers.
    pub async fn pointer_leave(&mut self) {
        let patch = self.cursor.pointer_leave();
        self.publish_presence(patch).await;
    }

    /// Grow the in-progress placement to the current pointer.
    async fn size_gesture(&mut self, at: Point) {
        let DrawGesture::Sizing { id, anchor } = self.gesture else {
            return;
        };
        let Some(mut record) = self.store.get(&id).cloned() else {
            return;
        };
        match record.kind {
            ShapeKind::Rectangle | ShapeKind::Triangle => {
                record.width = Some((at.x - anchor.x).max(0.0));
                record.height = Some((at.y - anchor.y).max(0.0));
            }
            ShapeKind::Circle => {
                record.radius = Some((at.x - anchor.x).abs() / 2.0);
            }
            ShapeKind::Line => {
                let Some(points) = &mut record.points else {
                    return;
                };
                if let Some(end) = points.last_mut() {
                    *end = at;
                }
            }
            ShapeKind::Text | ShapeKind::Image | ShapeKind::Path => return,
        }
        self.publish_op(StorageOp::Put { record }).await;
        self.sync_scene();
    }

    // =========================================================================
    // SURFACE EVENTS
    // =========================================================================

    /// Apply one event reported by the render surface.
    pub async fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::PointerDown { at } => self.pointer_down(at).await,
            SurfaceEvent::PointerMove { at } => self.pointer_move(at).await,
            SurfaceEvent::PointerUp { at } => self.pointer_up(at),
            SurfaceEvent::PointerLeave => self.pointer_leave().await,
            SurfaceEvent::ObjectModified { record } => self.object_modified(record).await,
            SurfaceEvent::ObjectScaling { record } => {
                self.in_flight = Some(record.object_id);
            }
            SurfaceEvent::SelectionCreated { ids } => {
                self.selection = Selection::from_ids(ids);
            }
            SurfaceEvent::SelectionCleared => self.selection = Selection::None,
            SurfaceEvent::PathCreated { points, stroke, stroke_width } => {
                self.path_created(points, stroke, stroke_width).await;
            }
        }
    }

    /// A surface gesture finished; its result becomes canonical.
    async fn object_modified(&mut self, record: ShapeRecord) {
        self.in_flight = None;
        let before = self.store.get(&record.object_id).cloned();
        self.scene.adopt_local(&record);
        self.history.commit(record.object_id, before, Some(record.clone()));
        self.publish_op(StorageOp::Put { record }).await;
    }

    /// A freehand stroke finished on the surface. A stroke needs two
    /// vertices to draw; anything shorter is a stray tap.
    async fn path_created(&mut self, points: Vec<Point>, stroke: String, stroke_width: f64) {
        if points.len() < 2 {
            return;
        }
        let record = factory::create_path(points, stroke, stroke_width);
        let id = record.object_id;
        self.scene.adopt_local(&record);
        self.publish_op(StorageOp::Put { record: record.clone() }).await;
        self.history.commit(id, None, Some(record));
    }

    // =========================================================================
    // KEYBOARD AND CHAT
    // =========================================================================

    /// Route one keyboard event.
    pub async fn handle_key(&mut self, key: &Key, modifiers: Modifiers) {
        if modifiers.command() {
            match key.0.as_str() {
                "c" => self.copy_selection(),
                "v" => self.paste().await,
                "x" => self.cut_selection().await,
                "z" => self.undo().await,
                "y" => self.redo().await,
                _ => {}
            }
            return;
        }

        // An open chat input captures ordinary typing; only the keys
        // that end or dismiss the chat pass through.
        if matches!(self.cursor.mode(), CursorMode::Chat { .. }) {
            match key.0.as_str() {
                "Enter" => self.cursor.chat_enter(),
                "Escape" => self.dismiss_overlay().await,
                _ => {}
            }
            return;
        }

        match key.0.as_str() {
            "/" => self.cursor.open_chat(),
            "e" => self.cursor.open_selector(),
            "Escape" => self.dismiss_overlay().await,
            "Delete" | "Backspace" => self.delete_selection().await,
            _ => {}
        }
    }

    /// Replace the in-progress chat text with the input's content.
    pub async fn chat_input(&mut self, text: &str) {
        if let Some(patch) = self.cursor.chat_input(text) {
            self.publish_presence(patch).await;
        }
    }

    /// Pick a reaction from the selector; the pointer now flings it.
    pub fn select_reaction(&mut self, value: impl Into<String>) {
        self.cursor.select_reaction(value);
    }

    /// Escape: back to a plain hidden cursor, chat bubble gone for
    /// peers.
    pub async fn dismiss_overlay(&mut self) {
        let patch = self.cursor.hide();
        self.publish_presence(patch).await;
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Apply a property edit to the single selected shape.
    ///
    /// A group or empty selection, an unknown record, and a no-change
    /// edit are all silent no-ops.
    pub async fn modify_selected(&mut self, edit: &ShapeEdit) {
        let Some(id) = self.selection.single() else {
            return;
        };
        let Some(current) = self.store.get(&id).cloned() else {
            return;
        };
        let Some(updated) = mutator::modify(&current, edit) else {
            return;
        };
        self.publish_op(StorageOp::Put { record: updated.clone() }).await;
        self.history.commit(id, Some(current), Some(updated));
        self.sync_scene();
    }

    /// Move the single selected shape to the top or bottom of paint
    /// order. Paint order is local; peers only observe the record
    /// re-put.
    pub async fn reorder_selected(&mut self, direction: Direction) {
        let Some(id) = self.selection.single() else {
            return;
        };
        if !self.scene.reorder(id, direction, self.surface.as_mut()) {
            return;
        }
        if let Some(record) = self.store.get(&id).cloned() {
            self.publish_op(StorageOp::Put { record }).await;
        }
    }

    /// Delete every selected shape.
    pub async fn delete_selection(&mut self) {
        let ids: Vec<ObjectId> = match &self.selection {
            Selection::None => return,
            Selection::Single(id) => vec![*id],
            Selection::Group(ids) => ids.clone(),
        };
        for id in ids {
            let Some(before) = self.store.get(&id).cloned() else {
                continue;
            };
            self.publish_op(StorageOp::Delete { object_id: id }).await;
            self.history.commit(id, Some(before), None);
        }
        self.selection = Selection::None;
        self.sync_scene();
    }

    /// Wipe the whole canvas for everyone.
    pub async fn clear_canvas(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.publish_op(StorageOp::Clear).await;
        self.history.clear();
        self.selection = Selection::None;
        self.sync_scene();
    }

    // =========================================================================
    // COPY AND PASTE
    // =========================================================================

    /// Hold copies of the selected shapes for pasting.
    pub fn copy_selection(&mut self) {
        let ids: Vec<ObjectId> = match &self.selection {
            Selection::None => return,
            Selection::Single(id) => vec![*id],
            Selection::Group(ids) => ids.clone(),
        };
        let buffer: Vec<ShapeRecord> =
            ids.iter().filter_map(|id| self.store.get(id).cloned()).collect();
        if !buffer.is_empty() {
            self.copy_buffer = buffer;
        }
    }

    /// Insert the held copies, nudged so they land beside their source.
    /// Repeated pastes cascade further.
    pub async fn paste(&mut self) {
        if self.copy_buffer.is_empty() {
            return;
        }
        let mut pasted = Vec::with_capacity(self.copy_buffer.len());
        for source in &self.copy_buffer {
            let mut record = source.clone();
            record.object_id = Uuid::new_v4();
            record.left += PASTE_OFFSET;
            record.top += PASTE_OFFSET;
            pasted.push(record);
        }
        self.copy_buffer.clone_from(&pasted);
        for record in pasted {
            let id = record.object_id;
            self.publish_op(StorageOp::Put { record: record.clone() }).await;
            self.history.commit(id, None, Some(record));
        }
        self.sync_scene();
    }

    /// Copy the selection, then delete it.
    pub async fn cut_selection(&mut self) {
        self.copy_selection();
        self.delete_selection().await;
    }

    /// Put a property value on the host clipboard, with a notice either
    /// way. Returns whether the write landed.
    pub fn copy_value(&mut self, value: &str) -> bool {
        let Some(clipboard) = &mut self.clipboard else {
            warn!("session: no clipboard installed");
            self.notices
                .post("Clipboard unavailable", NoticeLevel::Error, Instant::now());
            return false;
        };
        match clipboard.write_text(value) {
            Ok(()) => {
                self.notices.post("Copied", NoticeLevel::Info, Instant::now());
                true
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "session: clipboard write failed");
                self.notices
                    .post("Failed to copy value", NoticeLevel::Error, Instant::now());
                false
            }
        }
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Roll back this participant's most recent mutation, unless a peer
    /// overwrote it since.
    pub async fn undo(&mut self) {
        let Some(op) = self.history.undo(&self.store) else {
            return;
        };
        self.publish_op(op).await;
        self.sync_scene();
    }

    /// Roll the most recently undone mutation forward again.
    pub async fn redo(&mut self) {
        let Some(op) = self.history.redo(&self.store) else {
            return;
        };
        self.publish_op(op).await;
        self.sync_scene();
    }

    // =========================================================================
    // IMAGE UPLOAD
    // =========================================================================

    /// Decode an uploaded file and insert it as an image shape.
    ///
    /// # Errors
    ///
    /// Returns the decode failure; the store is left untouched and no
    /// record is created.
    pub async fn upload_image(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> Result<ObjectId, ImageDecodeError> {
        let Some(decoder) = &self.image_decoder else {
            self.notices
                .post("Image upload unavailable", NoticeLevel::Error, Instant::now());
            return Err(ImageDecodeError::Unavailable);
        };
        let decoded = match decoder.decode(name, bytes).await {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), name, "session: image decode failed");
                return Err(e);
            }
        };
        let record = factory::create_image(&decoded);
        let id = record.object_id;
        self.publish_op(StorageOp::Put { record: record.clone() }).await;
        self.history.commit(id, None, Some(record));
        self.sync_scene();
        self.tool = Tool::Select;
        Ok(id)
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Paginated snapshot of the canonical shapes.
    #[must_use]
    pub fn export(&self) -> ExportedDocument {
        export_document(&self.store)
    }

    // =========================================================================
    // TIMED WORK
    // =========================================================================

    /// Emit one reaction if the pointer is held with a reaction armed.
    ///
    /// `run` calls this on its sampling cadence; an embedder driving
    /// `pump` from its own loop calls it on one of its own.
    pub async fn sample_reaction(&mut self) {
        let Some(value) = self.cursor.pressed_reaction() else {
            return;
        };
        let Some(cursor) = self.me.cursor else {
            return;
        };
        let event = ReactionEvent::new(cursor, value);
        self.reactions.insert(event.clone(), Instant::now());
        self.transport.publish(Payload::Event(event)).await;
    }

    /// Age out expired reactions and notices.
    ///
    /// `run` calls this once a second; an embedder driving `pump` calls
    /// it from its own loop.
    pub fn sweep(&mut self) {
        let now = Instant::now();
        self.reactions.prune(now);
        self.notices.prune(now);
    }

    // =========================================================================
    // DELIVERIES
    // =========================================================================

    /// Apply one delivery from the room.
    pub async fn apply_delivery(&mut self, delivery: Delivery) {
        match delivery.payload {
            Payload::Storage(op) => {
                self.store.apply(op);
                self.sync_scene();
            }
            Payload::Presence(patch) => {
                if delivery.from != self.transport.connection_id() {
                    self.roster.apply(delivery.from, &patch);
                }
            }
            Payload::Event(event) => {
                // Receiver clock decides visibility, not the sender's.
                self.reactions.insert(event, Instant::now());
            }
            Payload::Join => {
                self.roster.apply(delivery.from, &PresencePatch::new());
                self.announce_presence().await;
            }
            Payload::Leave => {
                self.roster.remove(delivery.from);
            }
        }
    }

    /// Drain every delivery already queued.
    pub async fn pump(&mut self) {
        while let Some(delivery) = self.transport.try_recv() {
            self.apply_delivery(delivery).await;
        }
    }

    /// Drive the session until the room goes away: deliveries as they
    /// arrive, reaction sampling and expiry sweeps on their intervals.
    /// Dropping the returned future stops all three.
    pub async fn run(&mut self) {
        let mut sample =
            tokio::time::interval(Duration::from_millis(self.config.reaction_sample_interval_ms));
        sample.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sweep =
            tokio::time::interval(Duration::from_millis(self.config.reaction_sweep_interval_ms));
        sweep.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            let wake = tokio::select! {
                delivery = self.transport.recv() => match delivery {
                    Some(delivery) => Wake::Delivery(delivery),
                    None => Wake::Closed,
                },
                _ = sample.tick() => Wake::Sample,
                _ = sweep.tick() => Wake::Sweep,
            };
            match wake {
                Wake::Delivery(delivery) => self.apply_delivery(delivery).await,
                Wake::Sample => self.sample_reaction().await,
                Wake::Sweep => self.sweep(),
                Wake::Closed => break,
            }
        }
        info!(connection_id = self.transport.connection_id(), "session: room closed");
    }

    /// Depart the room.
    pub async fn leave(&mut self) {
        self.transport.leave().await;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Identifier the room assigned to this connection.
    #[must_use]
    pub fn connection_id(&self) -> ConnectionId {
        self.transport.connection_id()
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Current surface selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Cursor overlay mode.
    #[must_use]
    pub fn cursor_mode(&self) -> &CursorMode {
        self.cursor.mode()
    }

    /// This participant's own presence.
    #[must_use]
    pub fn my_presence(&self) -> &PresenceRecord {
        &self.me
    }

    /// Peer presence records.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Floating reactions currently visible.
    #[must_use]
    pub fn reactions(&self) -> &ReactionList {
        &self.reactions
    }

    /// Transient notices currently visible.
    #[must_use]
    pub fn notices(&self) -> &NoticeCenter {
        &self.notices
    }

    /// The local replica of the shared store.
    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Paint-order mirror of the replica.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Undo entries currently held.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Redo entries currently held.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Change signal that fires whenever the replica mutates.
    #[must_use]
    pub fn subscribe_store(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Apply a storage op optimistically and publish it to the room.
    async fn publish_op(&mut self, op: StorageOp) {
        self.store.apply(op.clone());
        self.transport.publish(Payload::Storage(op)).await;
    }

    /// Apply a presence patch to the local record and publish it.
    async fn publish_presence(&mut self, patch: PresencePatch) {
        self.me.apply(&patch);
        self.transport.publish(Payload::Presence(patch)).await;
    }

    /// Republish the full presence record, for peers who just joined.
    async fn announce_presence(&mut self) {
        let mut patch = PresencePatch::new();
        if let Some(cursor) = self.me.cursor {
            patch = patch.with_cursor(cursor);
        }
        if let Some(color) = &self.me.cursor_color {
            patch = patch.with_cursor_color(color.clone());
        }
        if let Some(message) = &self.me.message {
            patch = patch.with_message(message.clone());
        }
        self.transport.publish(Payload::Presence(patch)).await;
    }

    /// Re-synchronize the scene and surface against the replica.
    fn sync_scene(&mut self) {
        self.scene
            .reconcile(&self.store.snapshot(), self.in_flight, self.surface.as_mut());
    }
}

// =============================================================================
// SESSION LOOP
// =============================================================================

/// Why the run loop woke up.
enum Wake {
    Delivery(Delivery),
    Sample,
    Sweep,
    Closed,
}
