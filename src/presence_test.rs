use super::*;

// =============================================================
// Patch fields
// =============================================================

#[test]
fn keep_leaves_value_untouched() {
    let mut slot = Some(3.0);
    Field::<f64>::Keep.apply_to(&mut slot);
    assert_eq!(slot, Some(3.0));
}

#[test]
fn clear_empties_value() {
    let mut slot = Some("hi".to_string());
    Field::<String>::Clear.apply_to(&mut slot);
    assert!(slot.is_none());
}

#[test]
fn set_replaces_value() {
    let mut slot = None;
    Field::Set("hi".to_string()).apply_to(&mut slot);
    assert_eq!(slot.as_deref(), Some("hi"));
}

// =============================================================
// Patch application
// =============================================================

#[test]
fn cursor_patch_keeps_message() {
    let mut record = PresenceRecord {
        cursor: None,
        cursor_color: Some("#E57373".to_string()),
        message: Some("typing".to_string()),
    };

    record.apply(&PresencePatch::new().with_cursor(Point::new(4.0, 5.0)));
    assert_eq!(record.cursor, Some(Point::new(4.0, 5.0)));
    assert_eq!(record.message.as_deref(), Some("typing"));
}

#[test]
fn clear_patch_removes_only_its_field() {
    let mut record = PresenceRecord {
        cursor: Some(Point::new(1.0, 1.0)),
        cursor_color: Some("#E57373".to_string()),
        message: Some("hello".to_string()),
    };

    record.apply(&PresencePatch::new().clear_message());
    assert!(record.message.is_none());
    assert!(record.cursor.is_some());
    assert!(record.cursor_color.is_some());
}

#[test]
fn empty_patch_reports_empty() {
    assert!(PresencePatch::new().is_empty());
    assert!(!PresencePatch::new().clear_cursor().is_empty());
}

// =============================================================
// Wire shape
// =============================================================

#[test]
fn keep_fields_are_absent_on_the_wire() {
    let patch = PresencePatch::new().with_cursor(Point::new(2.0, 3.0));
    let value = serde_json::to_value(&patch).unwrap();
    let obj = value.as_object().unwrap();
    assert!(obj.contains_key("cursor"));
    assert!(!obj.contains_key("message"));
    assert!(!obj.contains_key("cursor_color"));
}

#[test]
fn clear_is_null_on_the_wire() {
    let patch = PresencePatch::new().clear_cursor();
    let value = serde_json::to_value(&patch).unwrap();
    assert!(value.as_object().unwrap().get("cursor").unwrap().is_null());
}

#[test]
fn wire_null_deserializes_to_clear() {
    let patch: PresencePatch = serde_json::from_str("{\"cursor\":null}").unwrap();
    assert_eq!(patch.cursor, Field::Clear);
    assert_eq!(patch.message, Field::Keep);
}

#[test]
fn wire_value_deserializes_to_set() {
    let patch: PresencePatch =
        serde_json::from_str("{\"message\":\"hey\",\"cursor\":{\"x\":1.0,\"y\":2.0}}").unwrap();
    assert_eq!(patch.message, Field::Set("hey".to_string()));
    assert_eq!(patch.cursor, Field::Set(Point::new(1.0, 2.0)));
}

// =============================================================
// Roster
// =============================================================

#[test]
fn roster_tracks_peers_by_connection() {
    let mut roster = Roster::new();
    roster.apply(7, &PresencePatch::new().with_cursor(Point::new(1.0, 1.0)));
    roster.apply(3, &PresencePatch::new().with_message("yo"));

    assert_eq!(roster.len(), 2);
    assert_eq!(roster.get(7).unwrap().cursor, Some(Point::new(1.0, 1.0)));
    assert_eq!(roster.get(3).unwrap().message.as_deref(), Some("yo"));

    let ids: Vec<ConnectionId> = roster.others().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![3, 7]);
}

#[test]
fn roster_accumulates_patches_per_peer() {
    let mut roster = Roster::new();
    roster.apply(1, &PresencePatch::new().with_cursor(Point::new(1.0, 1.0)));
    roster.apply(1, &PresencePatch::new().with_message("hi"));

    let record = roster.get(1).unwrap();
    assert!(record.cursor.is_some());
    assert_eq!(record.message.as_deref(), Some("hi"));
}

#[test]
fn leave_drops_the_record() {
    let mut roster = Roster::new();
    roster.apply(1, &PresencePatch::new().with_cursor(Point::new(1.0, 1.0)));
    assert!(roster.remove(1).is_some());
    assert!(roster.is_empty());
    assert!(roster.remove(1).is_none());
}

// =============================================================
// Colors
// =============================================================

#[test]
fn cursor_colors_cycle_through_palette() {
    assert_eq!(cursor_color_for(0), "#E57373");
    assert_eq!(cursor_color_for(1), "#9575CD");
    assert_eq!(cursor_color_for(8), "#E57373");
    assert_eq!(cursor_color_for(11), "#81C784");
}
