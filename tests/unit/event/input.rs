use super::*;

#[test]
fn kinds_parse_case_insensitively() {
    for kind in EventKind::ALL {
        assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(EventKind::parse("MouseMove"), Some(EventKind::MouseMove));
    assert_eq!(EventKind::parse("touchstart"), None);
    assert_eq!(EventKind::DblClick.to_string(), "dblclick");

    let k: EventKind = serde_json::from_str(r#""contextmenu""#).unwrap();
    assert_eq!(k, EventKind::ContextMenu);
}

#[test]
fn anything_but_down_is_up() {
    assert_eq!(Phase::parse("Down"), Phase::Down);
    assert_eq!(Phase::parse("up"), Phase::Up);
    assert_eq!(Phase::parse("sideways"), Phase::Up);
}

#[test]
fn positions_flip_y_and_map_to_clip_space() {
    let size = Size::new(200.0, 100.0);
    let e = PointerEvent::new(
        EventKind::Click,
        Point::new(60.0, 45.0),
        Rect::from_origin_size(Point::new(10.0, 20.0), size),
        size,
    );
    assert_eq!(e.surface_position(), Point::new(50.0, 75.0));
    assert_eq!(e.clip_position(), Point::new(-0.5, 0.5));

    let corner = PointerEvent::at(EventKind::Click, 0.0, 0.0, size);
    assert_eq!(corner.clip_position(), Point::new(-1.0, 1.0));
}

#[test]
fn info_tracks_stop_and_cursor() {
    let hit = Hit {
        id: ObjectId::from("a"),
        u: 0.1,
        v: 0.2,
        point: Vec3::new(0.0, 0.0, -0.5),
    };
    let event = PointerEvent::at(EventKind::Wheel, 100.0, 50.0, Size::new(200.0, 100.0)).with_delta_y(-3.0);
    let mut info = EventInfo::new(EventKind::Wheel, Phase::Down, &hit, &event);
    assert_eq!(info.object_id.as_str(), "a");
    assert_eq!(info.delta_y, Some(-3.0));
    assert_eq!(info.coord, hit.point);
    assert!(!info.is_stopped());

    info.stop_propagation();
    info.set_cursor("pointer");
    assert!(info.is_stopped());
    assert_eq!(info.take_cursor().as_deref(), Some("pointer"));
    assert_eq!(info.take_cursor(), None);
}
