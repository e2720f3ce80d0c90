use super::*;
use serde_json::json;

// =============================================================================
// Client events: parsing
// =============================================================================

#[test]
fn join_parses_with_camel_case_fields() {
    let event: ClientEvent =
        serde_json::from_value(json!({"event": "join", "roomId": "r1", "username": "ann"}))
            .unwrap();
    assert_eq!(event, ClientEvent::Join { room_id: "r1".into(), username: "ann".into() });
}

#[test]
fn join_username_defaults_to_empty() {
    let event: ClientEvent =
        serde_json::from_value(json!({"event": "join", "roomId": "r1"})).unwrap();
    assert_eq!(event, ClientEvent::Join { room_id: "r1".into(), username: String::new() });
}

#[test]
fn stroke_start_parses() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "stroke:start",
        "strokeId": "s1",
        "color": "#e6194b",
        "width": 5,
        "mode": "erase",
        "x": 10.5,
        "y": 20.0
    }))
    .unwrap();
    let ClientEvent::StrokeStart { stroke_id, color, width, mode, x, y } = event else {
        panic!("expected stroke:start");
    };
    assert_eq!(stroke_id, "s1");
    assert_eq!(color, "#e6194b");
    assert!((width - 5.0).abs() < f64::EPSILON);
    assert_eq!(mode, DrawMode::Erase);
    assert!((x - 10.5).abs() < f64::EPSILON);
    assert!((y - 20.0).abs() < f64::EPSILON);
}

#[test]
fn unknown_mode_coerces_to_draw() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "stroke:start",
        "strokeId": "s1",
        "width": 2,
        "mode": "spraycan",
        "x": 0,
        "y": 0
    }))
    .unwrap();
    let ClientEvent::StrokeStart { mode, .. } = event else {
        panic!("expected stroke:start");
    };
    assert_eq!(mode, DrawMode::Draw);
}

#[test]
fn commit_parses_without_optional_fields() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "op:commit",
        "mode": "draw",
        "color": "#e6194b",
        "width": 5,
        "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}]
    }))
    .unwrap();
    let ClientEvent::OpCommit(candidate) = event else {
        panic!("expected op:commit");
    };
    assert!(candidate.op_id.is_none());
    assert!(candidate.timestamp.is_none());
    assert_eq!(candidate.points.len(), 2);
}

#[test]
fn commit_parses_with_client_supplied_id() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "op:commit",
        "opId": "op_abc",
        "mode": "erase",
        "width": 9,
        "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}],
        "timestamp": 42
    }))
    .unwrap();
    let ClientEvent::OpCommit(candidate) = event else {
        panic!("expected op:commit");
    };
    assert_eq!(candidate.op_id.as_deref(), Some("op_abc"));
    assert_eq!(candidate.timestamp, Some(42));
    assert_eq!(candidate.mode, DrawMode::Erase);
    assert_eq!(candidate.color, "");
}

#[test]
fn bare_events_parse() {
    for (raw, expected) in [
        (json!({"event": "op:undo"}), ClientEvent::OpUndo),
        (json!({"event": "op:redo"}), ClientEvent::OpRedo),
        (json!({"event": "canvas:clear"}), ClientEvent::CanvasClear),
    ] {
        let event: ClientEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event, expected);
    }
}

#[test]
fn unknown_event_is_rejected() {
    let result: Result<ClientEvent, _> =
        serde_json::from_value(json!({"event": "room:nuke"}));
    assert!(result.is_err());
}

// =============================================================================
// Server events: wire shape
// =============================================================================

fn sample_op() -> StrokeOp {
    StrokeOp {
        kind: OpKind::Stroke,
        mode: DrawMode::Draw,
        color: "#e6194b".into(),
        width: 5.0,
        points: vec![Point { x: 0.0, y: 0.0 }, Point { x: 3.0, y: 4.0 }],
        user_id: Uuid::new_v4(),
        timestamp: 1_700_000_000_000,
        op_id: "op_1".into(),
    }
}

#[test]
fn joined_serializes_with_event_tag() {
    let user = Participant { id: Uuid::new_v4(), name: "ann".into(), color: "#e6194b".into() };
    let event = ServerEvent::Joined {
        room_id: "r1".into(),
        user: user.clone(),
        users: vec![user],
        ops: vec![],
        canvas_size: CanvasSize { width: 800, height: 500 },
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "joined");
    assert_eq!(value["roomId"], "r1");
    assert_eq!(value["canvasSize"]["width"], 800);
    assert_eq!(value["users"][0]["name"], "ann");
}

#[test]
fn op_commit_serializes_flat_stroke_operation() {
    let op = sample_op();
    let value = serde_json::to_value(ServerEvent::OpCommit(op.clone())).unwrap();
    assert_eq!(value["event"], "op:commit");
    assert_eq!(value["type"], "stroke");
    assert_eq!(value["mode"], "draw");
    assert_eq!(value["opId"], "op_1");
    assert_eq!(value["userId"], op.user_id.to_string());
    assert_eq!(value["points"][1]["x"], 3.0);
}

#[test]
fn ops_snapshot_serializes_ordered_history() {
    let value =
        serde_json::to_value(ServerEvent::OpsSnapshot { ops: vec![sample_op(), sample_op()] })
            .unwrap();
    assert_eq!(value["event"], "ops:snapshot");
    assert_eq!(value["ops"].as_array().unwrap().len(), 2);
}

#[test]
fn user_left_serializes_user_id() {
    let user_id = Uuid::new_v4();
    let value = serde_json::to_value(ServerEvent::UserLeft { user_id }).unwrap();
    assert_eq!(value["event"], "user:left");
    assert_eq!(value["userId"], user_id.to_string());
}

#[test]
fn server_events_round_trip() {
    let events = vec![
        ServerEvent::OpCommit(sample_op()),
        ServerEvent::OpsSnapshot { ops: vec![sample_op()] },
        ServerEvent::Cursor { user_id: Uuid::new_v4(), x: 1.0, y: 2.0 },
        ServerEvent::Error { message: "Room ID is required to join.".into() },
    ];
    for event in events {
        let json = serde_json::to_string(&event).unwrap();
        let restored: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}

#[test]
fn stroke_op_mode_erase_round_trips() {
    let mut op = sample_op();
    op.mode = DrawMode::Erase;
    let json = serde_json::to_string(&op).unwrap();
    assert!(json.contains(r#""mode":"erase""#));
    let restored: StrokeOp = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.mode, DrawMode::Erase);
}
