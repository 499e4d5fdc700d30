//! Convergence — multi-replica scenarios driven end to end through the
//! in-process room hub.
//!
//! Every test lets replicas mutate without pumping deliveries in
//! between, then drains all queues and asserts the replicas agree. The
//! store carries no merge metadata, so agreement falls out of one
//! property alone: every replica re-applies the room's delivery order,
//! its own echoes included.

use sketchflow::input::{SurfaceEvent, Tool};
use sketchflow::room::RoomHub;
use sketchflow::scene::RenderSurface;
use sketchflow::session::{Session, SessionConfig};
use sketchflow::shape::{ObjectId, Point, ShapeRecord};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Surface double that swallows every call; these tests only watch the
/// replicas.
struct NullSurface;

impl RenderSurface for NullSurface {
    fn add(&mut self, _record: &ShapeRecord) {}
    fn update(&mut self, _record: &ShapeRecord) {}
    fn remove(&mut self, _id: ObjectId) {}
    fn bring_to_front(&mut self, _id: ObjectId) {}
    fn send_to_back(&mut self, _id: ObjectId) {}
    fn set_freehand(&mut self, _enabled: bool) {}
    fn request_render_all(&mut self) {}
}

async fn connect(hub: &RoomHub) -> Session {
    let welcome = hub.join().await;
    Session::connect(
        Box::new(welcome.transport),
        welcome.snapshot,
        Box::new(NullSurface),
        SessionConfig::new(),
    )
    .await
}

/// Place a default rectangle through the full tool gesture.
async fn place(session: &mut Session, x: f64, y: f64) -> ObjectId {
    let seen: Vec<ObjectId> =
        session.store().records().iter().map(|r| r.object_id).collect();
    session.activate_tool(Tool::Rectangle).await;
    session.pointer_down(Point::new(x, y)).await;
    session.pointer_up(Point::new(x, y));
    session
        .store()
        .records()
        .iter()
        .map(|r| r.object_id)
        .find(|id| !seen.contains(id))
        .unwrap()
}

/// Recolor a shape the way a finished surface gesture would.
async fn recolor(session: &mut Session, id: ObjectId, fill: &str) {
    let mut record = session.store().get(&id).cloned().unwrap();
    record.fill = fill.into();
    session
        .handle_surface_event(SurfaceEvent::ObjectModified { record })
        .await;
}

async fn delete(session: &mut Session, id: ObjectId) {
    session
        .handle_surface_event(SurfaceEvent::SelectionCreated { ids: vec![id] })
        .await;
    session.delete_selection().await;
}

fn assert_converged(sessions: &[&Session]) {
    let reference = sessions[0].store().snapshot();
    for session in &sessions[1..] {
        assert_eq!(session.store().snapshot(), reference);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn three_replicas_converge_under_interleaved_writes() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;
    let mut c = connect(&hub).await;

    let r1 = place(&mut a, 10.0, 10.0).await;
    let r2 = place(&mut b, 40.0, 40.0).await;
    a.pump().await;
    b.pump().await;
    c.pump().await;

    // Concurrent recolors of different shapes, queued before anyone pumps.
    recolor(&mut a, r2, "#111111").await;
    recolor(&mut b, r1, "#222222").await;
    recolor(&mut c, r1, "#333333").await;
    a.pump().await;
    b.pump().await;
    c.pump().await;

    assert_converged(&[&a, &b, &c]);
    assert_eq!(a.store().get(&r1).unwrap().fill, "#333333");
    assert_eq!(a.store().get(&r2).unwrap().fill, "#111111");
}

#[tokio::test]
async fn concurrent_recolors_settle_on_the_room_order() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;
    let id = place(&mut a, 10.0, 10.0).await;
    b.pump().await;

    recolor(&mut a, id, "#aa0000").await;
    recolor(&mut b, id, "#00bb00").await;
    a.pump().await;
    b.pump().await;

    assert_converged(&[&a, &b]);
    assert_eq!(a.store().get(&id).unwrap().fill, "#00bb00");
}

#[tokio::test]
async fn delete_races_resolve_by_last_write() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;
    let mut c = connect(&hub).await;
    let doomed = place(&mut a, 10.0, 10.0).await;
    let survivor = place(&mut a, 40.0, 40.0).await;
    a.pump().await;
    b.pump().await;
    c.pump().await;

    // Edit lands after the delete: the shape comes back with the edit.
    delete(&mut b, survivor).await;
    recolor(&mut c, survivor, "#333333").await;

    // Delete lands after the edit: the shape stays gone.
    recolor(&mut c, doomed, "#444444").await;
    delete(&mut b, doomed).await;

    a.pump().await;
    b.pump().await;
    c.pump().await;

    assert_converged(&[&a, &b, &c]);
    assert_eq!(a.store().get(&survivor).unwrap().fill, "#333333");
    assert!(a.store().get(&doomed).is_none());
}

#[tokio::test]
async fn a_late_joiner_matches_the_settled_replicas() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;
    let id = place(&mut a, 10.0, 10.0).await;
    place(&mut b, 40.0, 40.0).await;
    a.pump().await;
    b.pump().await;
    recolor(&mut a, id, "#111111").await;
    a.pump().await;
    b.pump().await;

    let c = connect(&hub).await;

    assert_converged(&[&a, &b, &c]);
    assert_eq!(c.store().len(), 2);
}

#[tokio::test]
async fn bulk_interleaved_puts_converge_with_stable_iteration_order() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;

    for i in 0..200 {
        let offset = f64::from(i) * 10.0;
        let record = sketchflow::factory::create_rectangle(Point::new(offset, 0.0));
        a.handle_surface_event(SurfaceEvent::ObjectModified { record }).await;
        let record = sketchflow::factory::create_rectangle(Point::new(offset, 500.0));
        b.handle_surface_event(SurfaceEvent::ObjectModified { record }).await;
    }
    a.pump().await;
    b.pump().await;

    assert_converged(&[&a, &b]);
    assert_eq!(a.store().len(), 400);
    let a_order: Vec<ObjectId> =
        a.store().records().iter().map(|r| r.object_id).collect();
    let b_order: Vec<ObjectId> =
        b.store().records().iter().map(|r| r.object_id).collect();
    assert_eq!(a_order, b_order);
}

#[tokio::test]
async fn a_clear_wipes_every_replica_in_room_order() {
    let hub = RoomHub::new();
    let mut a = connect(&hub).await;
    let mut b = connect(&hub).await;
    place(&mut a, 10.0, 10.0).await;
    a.pump().await;
    b.pump().await;

    // B's put is queued ahead of A's clear, so it is wiped with the rest.
    place(&mut b, 40.0, 40.0).await;
    a.clear_canvas().await;
    a.pump().await;
    b.pump().await;

    assert_converged(&[&a, &b]);
    assert!(a.store().is_empty());
}
