//! Input model: tools, modifier keys, surface events, and the gesture
//! state machine.
//!
//! This module defines the types consumed by the session. `Tool` and
//! `Modifiers` capture the user's intent at the time of an event.
//! `SurfaceEvent` is the vocabulary the render surface reports in.
//! `DrawGesture` is the active placement gesture tracked between
//! pointer-down and pointer-up, carrying the context needed to size the
//! provisional shape and commit it on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::shape::{ObjectId, Point, ShapeKind, ShapeRecord};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a rectangle.
    Rectangle,
    /// Place a triangle.
    Triangle,
    /// Place a circle.
    Circle,
    /// Place a straight line segment.
    Line,
    /// Place an editable text block.
    Text,
    /// Capture freehand strokes on the surface.
    Freeform,
    /// Prompt for an image upload.
    Image,
    /// Delete the current selection. Momentary, not a mode.
    Delete,
    /// Wipe the whole canvas. Momentary, not a mode.
    Reset,
}

impl Tool {
    /// Record kind this tool places on pointer-down, if it places one.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Triangle => Some(ShapeKind::Triangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Line => Some(ShapeKind::Line),
            Self::Text => Some(ShapeKind::Text),
            Self::Select | Self::Freeform | Self::Image | Self::Delete | Self::Reset => None,
        }
    }

    /// Whether activating this tool performs an action and then reverts
    /// to the selection tool instead of staying active.
    #[must_use]
    pub fn is_momentary(self) -> bool {
        matches!(self, Self::Delete | Self::Reset)
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform shortcut chord (ctrl or meta) is held.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the platform
/// (e.g. `"Escape"`, `"/"`, `"Enter"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Key from a platform key name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// What the render surface reports back to the session.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// Primary button pressed at a canvas position.
    PointerDown { at: Point },
    /// Pointer moved while over the canvas.
    PointerMove { at: Point },
    /// Primary button released at a canvas position.
    PointerUp { at: Point },
    /// Pointer left the canvas bounds.
    PointerLeave,
    /// A gesture on the surface finished mutating a shape; the record is
    /// the surface's canonical reading of the result.
    ObjectModified { record: ShapeRecord },
    /// A shape is being interactively scaled; fires continuously during
    /// the gesture, before any `ObjectModified`.
    ObjectScaling { record: ShapeRecord },
    /// The selection changed to the given shapes.
    SelectionCreated { ids: Vec<ObjectId> },
    /// The selection was dismissed.
    SelectionCleared,
    /// A freehand stroke finished; vertices are in canvas coordinates.
    PathCreated { points: Vec<Point>, stroke: String, stroke_width: f64 },
}

/// Which shapes are currently selected on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    None,
    /// Exactly one shape selected.
    Single(ObjectId),
    /// A multi-object selection. Mutations against it are rejected.
    Group(Vec<ObjectId>),
}

impl Selection {
    /// Selection from the surface's reported id list.
    #[must_use]
    pub fn from_ids(ids: Vec<ObjectId>) -> Self {
        match ids.as_slice() {
            [] => Self::None,
            [id] => Self::Single(*id),
            _ => Self::Group(ids),
        }
    }

    /// The single selected id, if exactly one shape is selected.
    #[must_use]
    pub fn single(&self) -> Option<ObjectId> {
        match self {
            Self::Single(id) => Some(*id),
            Self::None | Self::Group(_) => None,
        }
    }

    /// Whether this is a multi-object selection.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// Internal state for the placement gesture state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum DrawGesture {
    /// No placement in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A provisional shape was placed and is being sized by drag.
    Sizing {
        /// Id of the provisional record being sized.
        id: ObjectId,
        /// Canvas position of the placing pointer-down; the fixed corner
        /// the drag sizes away from.
        anchor: Point,
    },
    /// The surface is capturing a freehand stroke; the session waits for
    /// `PathCreated`.
    Freehand,
}
