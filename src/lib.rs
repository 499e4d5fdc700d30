//! Shared-state core for a realtime collaborative drawing surface.
//!
//! This crate owns everything that must agree between participants of a
//! drawing room: the replicated shape store and its last-write-wins
//! merge, the presence channel carrying live cursors and chat bubbles,
//! the ephemeral reaction broadcast, and each participant's undo
//! history. The host layer is responsible only for pixels and raw
//! input: it implements [`scene::RenderSurface`] over its canvas,
//! feeds pointer and keyboard events into a [`session::Session`], and
//! lets the session drive the transport.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | One participant's connection; the [`session::Session`] orchestrator |
//! | [`store`] | Replicated object store with last-write-wins merge |
//! | [`shape`] | Canonical shape records and geometry types |
//! | [`scene`] | Reconciliation between the replica and the render surface |
//! | [`factory`] | Default shape construction for each tool |
//! | [`mutator`] | Attribute panel edits against a record |
//! | [`history`] | Per-participant undo/redo with stale-entry discard |
//! | [`presence`] | Presence records, sparse patches, and the peer roster |
//! | [`cursor`] | Local cursor interaction state machine |
//! | [`reaction`] | Ephemeral emoji bursts with receiver-side expiry |
//! | [`notice`] | Transient local notices and the clipboard boundary |
//! | [`input`] | Tools, modifier keys, and render-surface events |
//! | [`transport`] | Wire payloads and the room transport boundary |
//! | [`room`] | In-process room hub fanning deliveries between peers |
//! | [`export`] | Pagination of the canonical shapes into a document |
//! | [`consts`] | Shared defaults and timings |

pub mod consts;
pub mod cursor;
pub mod export;
pub mod factory;
pub mod history;
pub mod input;
pub mod mutator;
pub mod notice;
pub mod presence;
pub mod reaction;
pub mod room;
pub mod scene;
pub mod session;
pub mod shape;
pub mod store;
pub mod transport;
