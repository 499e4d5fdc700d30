// =============================================================================
// SCENE TESTS
// =============================================================================

use std::collections::HashMap;

use super::test_helpers::{RecordingSurface, SurfaceCall};
use super::*;
use crate::factory;
use crate::shape::Point;

fn make_rect(x: f64, y: f64) -> ShapeRecord {
    factory::create_rectangle(Point::new(x, y))
}

fn as_map(records: &[ShapeRecord]) -> HashMap<ObjectId, ShapeRecord> {
    records
        .iter()
        .map(|record| (record.object_id, record.clone()))
        .collect()
}

#[test]
fn initial_reconcile_adds_every_record() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(10.0, 10.0)];
    let canonical = as_map(&records);

    scene.reconcile(&canonical, None, &mut surface);

    assert_eq!(scene.len(), 2);
    assert_eq!(surface.added().len(), 2);
    assert_eq!(surface.calls.last(), Some(&SurfaceCall::RenderAll));
}

#[test]
fn initial_adds_arrive_in_id_order() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(1.0, 1.0), make_rect(2.0, 2.0)];
    let canonical = as_map(&records);

    scene.reconcile(&canonical, None, &mut surface);

    let mut expected: Vec<ObjectId> = canonical.keys().copied().collect();
    expected.sort();
    assert_eq!(surface.added(), expected);
    assert_eq!(scene.paint_order(), expected.as_slice());
}

#[test]
fn reconcile_in_agreement_touches_nothing_but_render() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let canonical = as_map(&[make_rect(0.0, 0.0)]);
    scene.reconcile(&canonical, None, &mut surface);

    surface.calls.clear();
    scene.reconcile(&canonical, None, &mut surface);

    assert_eq!(surface.calls, vec![SurfaceCall::RenderAll]);
}

#[test]
fn vanished_record_is_removed_from_surface() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(5.0, 5.0)];
    let canonical = as_map(&records);
    scene.reconcile(&canonical, None, &mut surface);

    let survivor = records[0].object_id;
    let dropped = records[1].object_id;
    let shrunk = as_map(&records[..1]);
    surface.calls.clear();
    scene.reconcile(&shrunk, None, &mut surface);

    assert_eq!(surface.removed(), vec![dropped]);
    assert!(scene.contains(&survivor));
    assert!(!scene.contains(&dropped));
    assert_eq!(scene.paint_order(), &[survivor]);
}

#[test]
fn changed_attributes_overwrite_the_mirror() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let mut record = make_rect(0.0, 0.0);
    scene.reconcile(&as_map(std::slice::from_ref(&record)), None, &mut surface);

    record.fill = "#ff0000".to_string();
    surface.calls.clear();
    scene.reconcile(&as_map(std::slice::from_ref(&record)), None, &mut surface);

    assert_eq!(surface.updated(), vec![record.object_id]);
    assert_eq!(
        scene.get(&record.object_id).map(|r| r.fill.as_str()),
        Some("#ff0000")
    );
}

#[test]
fn in_flight_shape_is_left_alone() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let mut record = make_rect(0.0, 0.0);
    scene.reconcile(&as_map(std::slice::from_ref(&record)), None, &mut surface);

    record.left = 300.0;
    let canonical = as_map(std::slice::from_ref(&record));
    surface.calls.clear();
    scene.reconcile(&canonical, Some(record.object_id), &mut surface);

    assert!(surface.updated().is_empty());
    assert_eq!(scene.get(&record.object_id).map(|r| r.left), Some(0.0));

    // Once the manipulation ends the canonical attributes land.
    scene.reconcile(&canonical, None, &mut surface);
    assert_eq!(surface.updated(), vec![record.object_id]);
    assert_eq!(scene.get(&record.object_id).map(|r| r.left), Some(300.0));
}

#[test]
fn adopted_local_record_is_not_re_added_by_its_echo() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let record = make_rect(40.0, 40.0);

    scene.adopt_local(&record);
    assert!(scene.contains(&record.object_id));
    assert!(surface.calls.is_empty());

    scene.reconcile(&as_map(std::slice::from_ref(&record)), None, &mut surface);
    assert!(surface.added().is_empty());
    assert_eq!(surface.calls, vec![SurfaceCall::RenderAll]);
}

#[test]
fn emptied_canonical_set_removes_everything() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(1.0, 1.0)];
    scene.reconcile(&as_map(&records), None, &mut surface);

    scene.reconcile(&HashMap::new(), None, &mut surface);

    assert!(scene.is_empty());
    assert!(scene.paint_order().is_empty());
    assert_eq!(surface.removed().len(), 2);
}

#[test]
fn reorder_front_moves_to_top_of_paint_order() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(1.0, 1.0)];
    scene.reconcile(&as_map(&records), None, &mut surface);

    let bottom = scene.paint_order()[0];
    surface.calls.clear();
    assert!(scene.reorder(bottom, Direction::Front, &mut surface));

    assert_eq!(scene.paint_order().last(), Some(&bottom));
    assert_eq!(surface.calls[0], SurfaceCall::BringToFront(bottom));
    assert_eq!(surface.calls.last(), Some(&SurfaceCall::RenderAll));
}

#[test]
fn reorder_back_moves_to_bottom_of_paint_order() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let records = vec![make_rect(0.0, 0.0), make_rect(1.0, 1.0)];
    scene.reconcile(&as_map(&records), None, &mut surface);

    let top = *scene.paint_order().last().unwrap();
    surface.calls.clear();
    assert!(scene.reorder(top, Direction::Back, &mut surface));

    assert_eq!(scene.paint_order()[0], top);
    assert_eq!(surface.calls[0], SurfaceCall::SendToBack(top));
}

#[test]
fn reorder_unknown_id_is_refused() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();

    assert!(!scene.reorder(ObjectId::new_v4(), Direction::Front, &mut surface));
    assert!(surface.calls.is_empty());
}

#[test]
fn locally_adopted_shape_paints_above_existing_ones() {
    let mut scene = Scene::new();
    let mut surface = RecordingSurface::new();
    let existing = make_rect(0.0, 0.0);
    scene.reconcile(&as_map(std::slice::from_ref(&existing)), None, &mut surface);

    let placed = make_rect(50.0, 50.0);
    scene.adopt_local(&placed);

    assert_eq!(scene.paint_order().last(), Some(&placed.object_id));
}
