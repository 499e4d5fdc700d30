//! Shape factory: turns a tool selection and a pointer position into a
//! fully-populated `ShapeRecord` with a freshly minted identifier.
//!
//! DESIGN
//! ======
//! - Construction and persistence are decoupled. The factory only
//!   allocates; writing the record into the store is the caller's job,
//!   which lets callers preview a shape before committing it.
//! - Every record leaves here carrying the palette defaults, so a
//!   freshly placed shape looks the same on every peer.
//! - Image records are not pointer-constructed. They enter through the
//!   import boundary below, which scales the decoded bitmap down to a
//!   manageable on-canvas size before the record is built.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use uuid::Uuid;

use crate::consts::{
    DEFAULT_CIRCLE_RADIUS, DEFAULT_FILL, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_FONT_WEIGHT, DEFAULT_LINE_EXTENT, DEFAULT_LINE_STROKE_WIDTH, DEFAULT_SHAPE_SIZE,
    DEFAULT_TEXT, IMAGE_TARGET_SIZE,
};
use crate::shape::{Point, ShapeKind, ShapeRecord};

// =============================================================================
// POINTER CONSTRUCTORS
// =============================================================================

/// Rectangle with default edge length, anchored at the pointer.
#[must_use]
pub fn create_rectangle(at: Point) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Rectangle, at.x, at.y);
    rec.width = Some(DEFAULT_SHAPE_SIZE);
    rec.height = Some(DEFAULT_SHAPE_SIZE);
    rec.fill = DEFAULT_FILL.to_string();
    rec
}

/// Triangle inscribed in the default bounding box, anchored at the pointer.
#[must_use]
pub fn create_triangle(at: Point) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Triangle, at.x, at.y);
    rec.width = Some(DEFAULT_SHAPE_SIZE);
    rec.height = Some(DEFAULT_SHAPE_SIZE);
    rec.fill = DEFAULT_FILL.to_string();
    rec
}

/// Circle with the default radius, anchored at the pointer.
#[must_use]
pub fn create_circle(at: Point) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Circle, at.x, at.y);
    rec.radius = Some(DEFAULT_CIRCLE_RADIUS);
    rec.fill = DEFAULT_FILL.to_string();
    rec
}

/// Line from the pointer to a point offset by the default extent on both
/// axes. Lines are stroked, never filled.
#[must_use]
pub fn create_line(at: Point) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Line, at.x, at.y);
    rec.points = Some(vec![
        at,
        Point::new(at.x + DEFAULT_LINE_EXTENT, at.y + DEFAULT_LINE_EXTENT),
    ]);
    rec.stroke = Some(DEFAULT_FILL.to_string());
    rec.stroke_width = Some(DEFAULT_LINE_STROKE_WIDTH);
    rec
}

/// Editable text block with placeholder content, anchored at the pointer.
#[must_use]
pub fn create_text(at: Point) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Text, at.x, at.y);
    rec.fill = DEFAULT_FILL.to_string();
    rec.text = Some(DEFAULT_TEXT.to_string());
    rec.font_family = Some(DEFAULT_FONT_FAMILY.to_string());
    rec.font_size = Some(DEFAULT_FONT_SIZE);
    rec.font_weight = Some(DEFAULT_FONT_WEIGHT.to_string());
    rec
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Construct a record for the given kind at the pointer.
///
/// Returns `None` for kinds that are not pointer-constructed: images
/// enter through `create_image` after a decode, paths through freehand
/// capture on the render surface.
#[must_use]
pub fn create_shape(kind: ShapeKind, at: Point) -> Option<ShapeRecord> {
    match kind {
        ShapeKind::Rectangle => Some(create_rectangle(at)),
        ShapeKind::Triangle => Some(create_triangle(at)),
        ShapeKind::Circle => Some(create_circle(at)),
        ShapeKind::Line => Some(create_line(at)),
        ShapeKind::Text => Some(create_text(at)),
        ShapeKind::Image | ShapeKind::Path => None,
    }
}

// =============================================================================
// IMAGE IMPORT
// =============================================================================

/// A bitmap decoded by the platform, ready to reference from a record.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Display reference the render surface can load (data URL or handle).
    pub source: String,
    /// Natural bitmap width in pixels.
    pub width: f64,
    /// Natural bitmap height in pixels.
    pub height: f64,
}

/// Why an uploaded file could not become an image record.
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("no image decoder installed")]
    Unavailable,
    #[error("empty image file: {0}")]
    Empty(String),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("corrupt image data: {0}")]
    Corrupt(String),
}

impl crate::transport::ErrorCode for ImageDecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable => "E_DECODER_UNAVAILABLE",
            Self::Empty(_) => "E_EMPTY_IMAGE",
            Self::UnsupportedFormat(_) => "E_UNSUPPORTED_FORMAT",
            Self::Corrupt(_) => "E_CORRUPT_IMAGE",
        }
    }
}

/// Platform decode boundary for uploaded image files.
///
/// A failed decode must leave no trace: the caller creates no record and
/// writes nothing to the store.
#[async_trait::async_trait]
pub trait ImageDecoder: Send + Sync {
    /// Decode raw file bytes into a displayable bitmap.
    async fn decode(&self, name: &str, bytes: &[u8]) -> Result<DecodedImage, ImageDecodeError>;
}

/// Image record for a decoded bitmap, scaled down for insertion.
///
/// The fit is uniform: width is fitted first, then height, so the height
/// fit wins whenever the bitmap reports valid bounds on both axes.
#[must_use]
pub fn create_image(image: &DecodedImage) -> ShapeRecord {
    let mut rec = ShapeRecord::new(Uuid::new_v4(), ShapeKind::Image, 0.0, 0.0);
    rec.width = Some(image.width);
    rec.height = Some(image.height);
    let mut scale = 1.0;
    if image.width > 0.0 {
        scale = IMAGE_TARGET_SIZE / image.width;
    }
    if image.height > 0.0 {
        scale = IMAGE_TARGET_SIZE / image.height;
    }
    rec.scale_x = scale;
    rec.scale_y = scale;
    rec.src = Some(image.source.clone());
    rec
}

// =============================================================================
// FREEHAND CAPTURE
// =============================================================================

/// Path record for a completed freehand stroke.
///
/// The bounding-box anchor is derived from the vertices; the vertices
/// themselves stay in canvas coordinates.
#[must_use]
pub fn create_path(points: Vec<Point>, stroke: String, stroke_width: f64) -> ShapeRecord {
    let left = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let mut rec = ShapeRecord::new(
        Uuid::new_v4(),
        ShapeKind::Path,
        if left.is_finite() { left } else { 0.0 },
        if top.is_finite() { top } else { 0.0 },
    );
    rec.points = Some(points);
    rec.stroke = Some(stroke);
    rec.stroke_width = Some(stroke_width);
    rec
}
