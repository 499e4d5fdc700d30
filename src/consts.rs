//! Shared constants for the sketchflow crate.

// ── Shape factory defaults ──────────────────────────────────────

/// Fill color applied to every newly inserted shape.
pub const DEFAULT_FILL: &str = "#aabbcc";

/// Edge length of a freshly inserted rectangle or triangle, in canvas units.
pub const DEFAULT_SHAPE_SIZE: f64 = 100.0;

/// Radius of a freshly inserted circle, in canvas units.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 50.0;

/// Stroke width of a freshly inserted line.
pub const DEFAULT_LINE_STROKE_WIDTH: f64 = 2.0;

/// Offset from a line's origin to its far endpoint, on both axes.
pub const DEFAULT_LINE_EXTENT: f64 = 100.0;

/// Placeholder content of a freshly inserted text shape.
pub const DEFAULT_TEXT: &str = "Tap to Type";

/// Font family of a freshly inserted text shape.
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

/// Font size of a freshly inserted text shape.
pub const DEFAULT_FONT_SIZE: f64 = 36.0;

/// Font weight of a freshly inserted text shape.
pub const DEFAULT_FONT_WEIGHT: &str = "400";

/// Edge an uploaded image is scaled toward at insertion, width fitted
/// first and height fitted second.
pub const IMAGE_TARGET_SIZE: f64 = 200.0;

// ── Clipboard ───────────────────────────────────────────────────

/// Offset applied to both axes of every pasted shape so copies land
/// beside their source instead of on top of it.
pub const PASTE_OFFSET: f64 = 10.0;

// ── Reactions ───────────────────────────────────────────────────

/// Lifetime of a floating reaction before the sweeper removes it.
pub const REACTION_TTL_MS: u64 = 4000;

/// Interval between reaction emissions while the pointer is held down.
pub const REACTION_SAMPLE_INTERVAL_MS: u64 = 100;

/// Interval between sweeps of expired reactions.
pub const REACTION_SWEEP_INTERVAL_MS: u64 = 1000;

// ── Cursor chat ─────────────────────────────────────────────────

/// Longest message a cursor chat bubble will hold; input past this is dropped.
pub const CHAT_MESSAGE_MAX: usize = 50;

// ── Notices ─────────────────────────────────────────────────────

/// Lifetime of a transient notice before it is dismissed.
pub const NOTICE_TTL_MS: u64 = 2000;

// ── History ─────────────────────────────────────────────────────

/// Upper bound on retained undo entries per participant.
pub const HISTORY_DEPTH: usize = 100;

// ── Export ──────────────────────────────────────────────────────

/// Width of one exported document page, in canvas units (A4 at 96 dpi).
pub const EXPORT_PAGE_WIDTH: f64 = 794.0;

/// Height of one exported document page, in canvas units (A4 at 96 dpi).
pub const EXPORT_PAGE_HEIGHT: f64 = 1123.0;

/// Hard ceiling on exported pages; content anchored past it lands on
/// the final page.
pub const EXPORT_MAX_PAGES: usize = 1000;

// ── Presence ────────────────────────────────────────────────────

/// Cursor color palette; a participant picks by connection id modulo length.
pub const CURSOR_COLORS: [&str; 8] = [
    "#E57373", "#9575CD", "#4FC3F7", "#81C784", "#FFF176", "#FF8A65", "#F06292", "#7986CB",
];
