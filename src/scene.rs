//! Local render cache: the disposable mirror between the store and the
//! render surface.
//!
//! DESIGN
//! ======
//! - The store owns the durable copy of every shape; the scene owns a
//!   derived mirror plus a paint order, and can be rebuilt from a store
//!   snapshot at any time without data loss.
//! - Reconciliation is a key diff against the full snapshot. Keys the
//!   store has and the mirror lacks are instantiated onto the surface,
//!   keys the mirror has and the store lacks are removed, and keys in
//!   both are overwritten with the canonical attributes when they
//!   differ. The one exception is the shape currently under local
//!   interactive manipulation, which is left alone so a drag in progress
//!   does not stutter against its own echoes.
//! - Records the surface itself produced (a finished drag, a freehand
//!   stroke) are adopted into the mirror without a repaint; the later
//!   echo then finds the mirror in agreement and touches nothing.
//! - Paint order is local. A reorder moves the shape here and on the
//!   surface; the record re-put it triggers does not reorder peers.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use crate::mutator::Direction;
use crate::shape::{ObjectId, ShapeRecord};

// =============================================================================
// SURFACE BOUNDARY
// =============================================================================

/// The rendering collaborator, addressed purely by identifier.
///
/// Implementations own pixels and hit-testing; the scene tells them
/// what exists and in what order, nothing else.
pub trait RenderSurface: Send {
    /// Instantiate a renderable for a record new to the surface.
    fn add(&mut self, record: &ShapeRecord);
    /// Overwrite a renderable's attributes with canonical ones.
    fn update(&mut self, record: &ShapeRecord);
    /// Dispose of the renderable under the id, if present.
    fn remove(&mut self, id: ObjectId);
    /// Move the renderable to the top of paint order.
    fn bring_to_front(&mut self, id: ObjectId);
    /// Move the renderable to the bottom of paint order.
    fn send_to_back(&mut self, id: ObjectId);
    /// Switch continuous freehand capture on or off.
    fn set_freehand(&mut self, enabled: bool);
    /// Commit pending changes to pixels.
    fn request_render_all(&mut self);
}

// =============================================================================
// SCENE
// =============================================================================

/// Client-local mirror of canonical shapes and their paint order.
#[derive(Debug, Default)]
pub struct Scene {
    mirror: HashMap<ObjectId, ShapeRecord>,
    paint_order: Vec<ObjectId>,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-synchronize mirror and surface against a store snapshot.
    ///
    /// `in_flight` names the shape under local interactive manipulation,
    /// if any; its canonical attributes are not applied this pass.
    pub fn reconcile(
        &mut self,
        canonical: &HashMap<ObjectId, ShapeRecord>,
        in_flight: Option<ObjectId>,
        surface: &mut dyn RenderSurface,
    ) {
        let mut missing: Vec<ObjectId> = canonical
            .keys()
            .filter(|id| !self.mirror.contains_key(id))
            .copied()
            .collect();
        missing.sort();
        for id in missing {
            if let Some(record) = canonical.get(&id) {
                surface.add(record);
                self.mirror.insert(id, record.clone());
                self.paint_order.push(id);
            }
        }

        let gone: Vec<ObjectId> = self
            .mirror
            .keys()
            .filter(|id| !canonical.contains_key(id))
            .copied()
            .collect();
        for id in &gone {
            surface.remove(*id);
            self.mirror.remove(id);
        }
        if !gone.is_empty() {
            self.paint_order.retain(|id| self.mirror.contains_key(id));
        }

        for (id, record) in canonical {
            if in_flight == Some(*id) {
                continue;
            }
            let Some(mirrored) = self.mirror.get_mut(id) else {
                continue;
            };
            if mirrored != record {
                surface.update(record);
                *mirrored = record.clone();
            }
        }

        surface.request_render_all();
    }

    /// Adopt a record the surface already renders without repainting it.
    pub fn adopt_local(&mut self, record: &ShapeRecord) {
        if !self.mirror.contains_key(&record.object_id) {
            self.paint_order.push(record.object_id);
        }
        self.mirror.insert(record.object_id, record.clone());
    }

    /// Move a shape to the top or bottom of paint order, here and on the
    /// surface. Returns `false` for ids the scene does not know.
    pub fn reorder(
        &mut self,
        id: ObjectId,
        direction: Direction,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if !self.mirror.contains_key(&id) {
            return false;
        }
        self.paint_order.retain(|other| *other != id);
        match direction {
            Direction::Front => {
                self.paint_order.push(id);
                surface.bring_to_front(id);
            }
            Direction::Back => {
                self.paint_order.insert(0, id);
                surface.send_to_back(id);
            }
        }
        surface.request_render_all();
        true
    }

    /// Mirrored record under an id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&ShapeRecord> {
        self.mirror.get(id)
    }

    /// Whether the scene mirrors an id.
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.mirror.contains_key(id)
    }

    /// Shape ids bottom to top.
    #[must_use]
    pub fn paint_order(&self) -> &[ObjectId] {
        &self.paint_order
    }

    /// Number of mirrored shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    /// Returns `true` when nothing is mirrored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
