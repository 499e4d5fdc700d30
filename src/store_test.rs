use uuid::Uuid;

use super::*;
use crate::factory;
use crate::shape::Point;

fn make_record() -> ShapeRecord {
    factory::create_rectangle(Point::new(0.0, 0.0))
}

// =============================================================
// Point operations
// =============================================================

#[test]
fn put_then_get_returns_record() {
    let mut store = ObjectStore::new();
    let rec = make_record();
    let id = rec.object_id;
    store.put(rec.clone());
    assert_eq!(store.get(&id), Some(&rec));
    assert_eq!(store.len(), 1);
}

#[test]
fn put_replaces_whole_record() {
    let mut store = ObjectStore::new();
    let mut rec = make_record();
    let id = rec.object_id;
    store.put(rec.clone());

    rec.fill = "#ff0000".to_string();
    rec.stroke = Some("#00ff00".to_string());
    store.put(rec);

    let stored = store.get(&id).unwrap();
    assert_eq!(stored.fill, "#ff0000");
    assert_eq!(stored.stroke.as_deref(), Some("#00ff00"));
}

#[test]
fn delete_returns_removed_record() {
    let mut store = ObjectStore::new();
    let rec = make_record();
    let id = rec.object_id;
    store.put(rec);

    let removed = store.delete(&id);
    assert!(removed.is_some());
    assert!(store.get(&id).is_none());
    assert!(store.is_empty());
}

#[test]
fn delete_missing_id_is_noop() {
    let mut store = ObjectStore::new();
    assert!(store.delete(&Uuid::new_v4()).is_none());
}

#[test]
fn clear_removes_everything() {
    let mut store = ObjectStore::new();
    store.put(make_record());
    store.put(make_record());
    store.clear();
    assert!(store.is_empty());
}

// =============================================================
// Change notification
// =============================================================

#[test]
fn revision_bumps_on_every_put() {
    let mut store = ObjectStore::new();
    assert_eq!(store.revision(), 0);
    store.put(make_record());
    assert_eq!(store.revision(), 1);

    // An equal re-put is still a write at this layer.
    let rec = make_record();
    store.put(rec.clone());
    store.put(rec);
    assert_eq!(store.revision(), 3);
}

#[test]
fn missed_delete_and_empty_clear_do_not_bump() {
    let mut store = ObjectStore::new();
    store.delete(&Uuid::new_v4());
    store.clear();
    assert_eq!(store.revision(), 0);
}

#[test]
fn subscriber_observes_changes() {
    let mut store = ObjectStore::new();
    let mut rx = store.subscribe();
    assert!(!rx.has_changed().unwrap());

    store.put(make_record());
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 1);
}

#[tokio::test]
async fn subscriber_wakes_after_mutation() {
    let mut store = ObjectStore::new();
    let mut rx = store.subscribe();
    store.put(make_record());
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), 1);
}

// =============================================================
// Replicated ops
// =============================================================

#[test]
fn apply_put_delete_clear() {
    let mut store = ObjectStore::new();
    let rec = make_record();
    let id = rec.object_id;

    store.apply(StorageOp::Put { record: rec });
    assert_eq!(store.len(), 1);

    store.apply(StorageOp::Delete { object_id: id });
    assert!(store.is_empty());

    store.put(make_record());
    store.apply(StorageOp::Clear);
    assert!(store.is_empty());
}

#[test]
fn ops_roundtrip_as_json() {
    let rec = make_record();
    let op = StorageOp::Put { record: rec };
    let json = serde_json::to_string(&op).unwrap();
    assert!(json.contains("\"op\":\"put\""));
    let back: StorageOp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, op);

    let op = StorageOp::Delete { object_id: Uuid::new_v4() };
    let json = serde_json::to_string(&op).unwrap();
    let back: StorageOp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, op);
}

#[test]
fn snapshot_is_detached_copy() {
    let mut store = ObjectStore::new();
    let rec = make_record();
    let id = rec.object_id;
    store.put(rec);

    let snap = store.snapshot();
    store.delete(&id);
    assert!(snap.contains_key(&id));
    assert!(store.is_empty());
}

#[test]
fn records_iterate_in_id_order() {
    let mut store = ObjectStore::new();
    for _ in 0..8 {
        store.put(make_record());
    }
    let records = store.records();
    assert_eq!(records.len(), 8);
    for pair in records.windows(2) {
        assert!(pair[0].object_id < pair[1].object_id);
    }
}
