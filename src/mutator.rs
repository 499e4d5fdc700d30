//! Shape mutator: property edits against a single selected record.
//!
//! DESIGN
//! ======
//! - Edits are whole-record. The mutator derives a fresh canonical
//!   record from the current one; the caller commits that record to the
//!   store so peers always receive a self-consistent snapshot, never a
//!   field-level patch.
//! - `Width` and `Height` reset the scale factor on their axis to 1
//!   before writing the literal dimension. Interactive resizing works by
//!   scaling, so without the reset a panel edit of "150" would land at
//!   150 times whatever scale the last drag left behind.
//! - A dimension edit always produces a record, even when the value
//!   already matches. Every other edit is dropped when it would leave
//!   the record unchanged, which keeps redundant writes off the wire.

#[cfg(test)]
#[path = "mutator_test.rs"]
mod mutator_test;

use crate::shape::ShapeRecord;

// =============================================================================
// TYPES
// =============================================================================

/// One property edit from the attribute panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEdit {
    /// Literal bounding-box width; resets the horizontal scale.
    Width(f64),
    /// Literal bounding-box height; resets the vertical scale.
    Height(f64),
    /// Fill color.
    Fill(String),
    /// Stroke color.
    Stroke(String),
    /// Stroke width.
    StrokeWidth(f64),
    /// Font family, for text shapes.
    FontFamily(String),
    /// Font size, for text shapes.
    FontSize(f64),
    /// Font weight, for text shapes.
    FontWeight(String),
}

/// Where a reorder moves the shape within paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Top of paint order, above every other shape.
    Front,
    /// Bottom of paint order, beneath every other shape.
    Back,
}

// =============================================================================
// MODIFY
// =============================================================================

/// Apply one edit to a record, yielding the next canonical record.
///
/// Returns `None` when the edit would leave the record unchanged.
/// Dimension edits are exempt from that short-circuit and always yield.
#[must_use]
pub fn modify(current: &ShapeRecord, edit: &ShapeEdit) -> Option<ShapeRecord> {
    let mut updated = current.clone();
    match edit {
        ShapeEdit::Width(v) => {
            updated.scale_x = 1.0;
            updated.width = Some(*v);
            return Some(updated);
        }
        ShapeEdit::Height(v) => {
            updated.scale_y = 1.0;
            updated.height = Some(*v);
            return Some(updated);
        }
        ShapeEdit::Fill(v) => updated.fill.clone_from(v),
        ShapeEdit::Stroke(v) => updated.stroke = Some(v.clone()),
        ShapeEdit::StrokeWidth(v) => updated.stroke_width = Some(*v),
        ShapeEdit::FontFamily(v) => updated.font_family = Some(v.clone()),
        ShapeEdit::FontSize(v) => updated.font_size = Some(*v),
        ShapeEdit::FontWeight(v) => updated.font_weight = Some(v.clone()),
    }
    if updated == *current {
        return None;
    }
    Some(updated)
}
