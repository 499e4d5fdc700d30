//! Shape model: the records that describe what is on the drawing surface.
//!
//! This module defines the core data types shared by every other layer
//! (`ShapeRecord`, `ShapeKind`, `Point`). A record is the unit of
//! replication: peers exchange whole records, never field deltas, so a
//! record must carry everything a render surface needs to draw the shape.
//!
//! Data flows into this layer from the room transport (JSON
//! deserialization) and from the shape factory and mutator (construction
//! and edits). The reconciler reads records to keep a render surface in
//! step with the store.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a shape record.
pub type ObjectId = Uuid;

/// A point on the drawing surface in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Distance from the left edge of the surface.
    pub x: f64,
    /// Distance from the top edge of the surface.
    pub y: f64,
}

impl Point {
    /// Construct a point from its coordinates.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The kind of a shape record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Isosceles triangle inscribed within the bounding box.
    Triangle,
    /// Circle described by a center-relative radius.
    Circle,
    /// Straight line segment between two endpoints stored in `points`.
    Line,
    /// Editable text block.
    Text,
    /// Bitmap image referenced by `src`.
    Image,
    /// Freehand polyline with vertices stored in `points`.
    Path,
}

/// A shape as stored in the document and on the wire.
///
/// Dimensions are sparse: a circle carries `radius` but no `width`, a
/// line carries only `points`. `scale_x` and `scale_y` multiply the
/// stored dimensions at render time; interactive resizing adjusts the
/// scale while attribute edits write the dimension back and reset the
/// scale on that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Unique identifier for this shape.
    pub object_id: ObjectId,
    /// Shape type.
    pub kind: ShapeKind,
    /// Left edge of the bounding box in canvas coordinates.
    pub left: f64,
    /// Top edge of the bounding box in canvas coordinates.
    pub top: f64,
    /// Width of the bounding box, for kinds that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height of the bounding box, for kinds that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Circle radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Horizontal render-time multiplier over `width`.
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    /// Vertical render-time multiplier over `height`.
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    /// Line endpoints or freehand vertices, in canvas coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    /// Fill color as a CSS color string.
    pub fill: String,
    /// Stroke color as a CSS color string, for stroked kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width in canvas units, for stroked kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Text content, for text shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font family, for text shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in canvas units, for text shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Font weight as a CSS weight string, for text shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Image source reference, for image shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

impl ShapeRecord {
    /// Bare record of the given kind at the given position. Dimension and
    /// styling fields start empty; the factory fills in per-kind defaults.
    #[must_use]
    pub fn new(object_id: ObjectId, kind: ShapeKind, left: f64, top: f64) -> Self {
        Self {
            object_id,
            kind,
            left,
            top,
            width: None,
            height: None,
            radius: None,
            scale_x: 1.0,
            scale_y: 1.0,
            points: None,
            fill: String::new(),
            stroke: None,
            stroke_width: None,
            text: None,
            font_family: None,
            font_size: None,
            font_weight: None,
            src: None,
        }
    }

    /// Rendered width: the stored width times the horizontal scale.
    #[must_use]
    pub fn scaled_width(&self) -> Option<f64> {
        self.width.map(|w| w * self.scale_x)
    }

    /// Rendered height: the stored height times the vertical scale.
    #[must_use]
    pub fn scaled_height(&self) -> Option<f64> {
        self.height.map(|h| h * self.scale_y)
    }
}
