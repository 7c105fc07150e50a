use std::cell::RefCell;

use super::*;
use crate::foundation::core::Size;
use crate::graph::node::{Handle, NodeOpts, instantiate};
use crate::render::programs::ProgramCache;
use crate::render::surface::RecordingSurface;

type Log = Rc<RefCell<Vec<String>>>;

fn router() -> Handle<EventRouter> {
    instantiate::<EventRouter>(&BuildCtx::default(), NodeOpts::default(), RouterParams::default())
        .unwrap()
}

fn square(cx: f64, cy: f64, half: f64, z: f64) -> TrianglePair {
    TrianglePair::from_quad([
        Vec3::new(cx - half, cy - half, z),
        Vec3::new(cx - half, cy + half, z),
        Vec3::new(cx + half, cy + half, z),
        Vec3::new(cx + half, cy - half, z),
    ])
}

fn recorder(log: &Log, tag: &'static str) -> EventHandler {
    let log = Rc::clone(log);
    Rc::new(move |info: &mut EventInfo| {
        log.borrow_mut()
            .push(format!("{tag}:{}:{}", info.object_id, info.kind));
    })
}

fn stopper(log: &Log, tag: &'static str) -> EventHandler {
    let log = Rc::clone(log);
    Rc::new(move |info: &mut EventInfo| {
        log.borrow_mut().push(tag.to_owned());
        info.stop_propagation();
    })
}

const SURFACE: Size = Size::new(200.0, 200.0);

/// Client pixel position of clip `(x, y)` on [`SURFACE`].
fn at(kind: EventKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(
        kind,
        (x + 1.0) * SURFACE.width / 2.0,
        (1.0 - y) * SURFACE.height / 2.0,
        SURFACE,
    )
}

fn frame(r: &Handle<EventRouter>) {
    let mut surface = RecordingSurface::new(SURFACE.width, SURFACE.height);
    let mut programs = ProgramCache::new();
    let mut ctx = FrameCtx::new(&mut surface, &mut programs);
    r.borrow_mut().update(&mut ctx).unwrap();
}

#[test]
fn unregistered_ids_survive_one_frame() {
    let r = router();
    let id = ObjectId::from("a");

    // frame N
    frame(&r);
    r.borrow_mut().register("a", square(0.0, 0.0, 0.5, 0.0));
    assert_eq!(r.borrow().hit_test(0.0, 0.0).len(), 1);

    // frame N+1, not re-registered
    frame(&r);
    assert!(r.borrow().is_registered(&id));
    assert_eq!(r.borrow().hit_test(0.0, 0.0).len(), 1);

    // frame N+2
    frame(&r);
    assert!(!r.borrow().is_registered(&id));
    assert!(r.borrow().hit_test(0.0, 0.0).is_empty());
}

#[test]
fn re_registration_keeps_ids_alive() {
    let r = router();
    for _ in 0..5 {
        frame(&r);
        r.borrow_mut().register("a", square(0.0, 0.0, 0.5, 0.0));
    }
    assert_eq!(r.borrow().registered_len(), 1);
}

#[test]
fn hit_test_lists_every_overlapping_object() {
    let r = router();
    {
        let mut r = r.borrow_mut();
        r.register("b", square(0.0, 0.0, 0.5, 0.5));
        r.register("a", square(0.0, 0.0, 0.5, -0.5));
        r.register("far", square(0.8, 0.8, 0.1, 0.0));
    }
    let hits = r.borrow().hit_test(0.0, 0.0);
    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(hits.iter().all(|h| h.u + h.v <= 1.0 + 1e-9));
    assert!(r.borrow().hit_test(0.9, -0.9).is_empty());
}

#[test]
fn down_runs_near_to_far_then_up_far_to_near() {
    let r = router();
    let log = Log::default();
    {
        let mut r = r.borrow_mut();
        r.register("near", square(0.0, 0.0, 0.5, -0.5));
        r.register("far", square(0.0, 0.0, 0.5, 0.5));
        assert!(r.on("click", "down", ["near", "far"], recorder(&log, "down")));
        assert!(r.on("click", "up", ["near", "far"], recorder(&log, "up")));
    }
    let outcome = r.borrow_mut().dispatch(&at(EventKind::Click, 0.0, 0.0));
    assert_eq!(
        *log.borrow(),
        vec!["down:near:click", "down:far:click", "up:far:click", "up:near:click"]
    );
    assert_eq!(outcome.handlers_run, 4);
    assert!(!outcome.stopped);
    assert_eq!(outcome.hits.len(), 2);
}

#[test]
fn stop_during_down_skips_the_rest() {
    let r = router();
    let log = Log::default();
    {
        let mut r = r.borrow_mut();
        r.register("near", square(0.0, 0.0, 0.5, -0.5));
        r.register("far", square(0.0, 0.0, 0.5, 0.5));
        r.on("click", "down", ["near"], stopper(&log, "near-down"));
        r.on("click", "down", ["far"], recorder(&log, "far-down"));
        r.on("click", "up", ["near", "far"], recorder(&log, "up"));
    }
    let outcome = r.borrow_mut().dispatch(&at(EventKind::Click, 0.1, -0.1));
    assert!(outcome.stopped);
    assert_eq!(*log.borrow(), vec!["near-down"]);
}

#[test]
fn all_handlers_of_the_stopping_object_still_run() {
    let r = router();
    let log = Log::default();
    {
        let mut r = r.borrow_mut();
        r.register("a", square(0.0, 0.0, 0.5, 0.0));
        r.on("mousedown", "up", ["a"], stopper(&log, "first"));
        r.on("mousedown", "up", ["a"], recorder(&log, "second"));
    }
    let outcome = r.borrow_mut().dispatch(&at(EventKind::MouseDown, 0.0, 0.0));
    assert!(outcome.stopped);
    assert_eq!(*log.borrow(), vec!["first", "second:a:mousedown"]);
}

#[test]
fn mouse_moves_synthesize_over_and_out() {
    let r = router();
    let log = Log::default();
    {
        let mut r = r.borrow_mut();
        r.register("left", square(-0.5, 0.0, 0.25, 0.0));
        r.register("right", square(0.5, 0.0, 0.25, 0.0));
        for kind in ["mouseover", "mouseout", "mousemove"] {
            r.on(kind, "down", ["left", "right"], recorder(&log, "h"));
        }
    }

    let first = r.borrow_mut().dispatch(&at(EventKind::MouseMove, -0.55, 0.0));
    assert_eq!(first.entered, vec![ObjectId::from("left")]);
    assert!(first.left.is_empty());

    let second = r.borrow_mut().dispatch(&at(EventKind::MouseMove, -0.45, 0.0));
    assert!(second.entered.is_empty() && second.left.is_empty());

    let third = r.borrow_mut().dispatch(&at(EventKind::MouseMove, 0.55, 0.1));
    assert_eq!(third.left, vec![ObjectId::from("left")]);
    assert_eq!(third.entered, vec![ObjectId::from("right")]);

    assert_eq!(
        *log.borrow(),
        vec![
            "h:left:mouseover",
            "h:left:mousemove",
            "h:left:mousemove",
            "h:left:mouseout",
            "h:right:mouseover",
            "h:right:mousemove",
        ]
    );
}

#[test]
fn stopping_mouseover_does_not_stop_mousemove() {
    let r = router();
    let log = Log::default();
    {
        let mut r = r.borrow_mut();
        r.register("a", square(0.0, 0.0, 0.5, 0.0));
        r.on("mouseover", "down", ["a"], stopper(&log, "over"));
        r.on("mousemove", "down", ["a"], recorder(&log, "move"));
    }
    let outcome = r.borrow_mut().dispatch(&at(EventKind::MouseMove, 0.0, 0.0));
    assert!(!outcome.stopped);
    assert_eq!(*log.borrow(), vec!["over", "move:a:mousemove"]);
}

#[test]
fn registration_api_edges() {
    let r = router();
    let log = Log::default();
    let handler = recorder(&log, "x");
    let mut r = r.borrow_mut();

    assert!(!r.on("touchstart", "down", ["a"], Rc::clone(&handler)));
    assert!(r.on("CLICK", "DOWN", ["a"], Rc::clone(&handler)));
    // Same handler twice is kept once.
    assert!(r.on("click", "down", ["a"], Rc::clone(&handler)));
    r.register("a", square(0.0, 0.0, 0.5, 0.0));
    assert_eq!(r.dispatch(&at(EventKind::Click, 0.0, 0.0)).handlers_run, 1);

    assert!(!r.off("click", "up", ["a"], &handler));
    assert!(!r.off("bogus", "down", ["a"], &handler));
    assert!(r.off("click", "down", ["a"], &handler));
    assert_eq!(r.dispatch(&at(EventKind::Click, 0.0, 0.0)).handlers_run, 0);
}

#[test]
fn handlers_see_hit_details_and_set_cursor() {
    let r = router();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    {
        let mut r = r.borrow_mut();
        r.register("a", square(0.0, 0.0, 0.5, 0.0));
        r.on_kind(
            EventKind::Wheel,
            Phase::Up,
            ["a"],
            Rc::new(move |info: &mut EventInfo| {
                *sink.borrow_mut() = Some((info.phase, info.delta_y, info.u + info.v));
                info.set_cursor("grab");
            }),
        );
    }
    let outcome = r
        .borrow_mut()
        .dispatch(&at(EventKind::Wheel, -0.25, 0.25).with_delta_y(12.0));
    assert_eq!(outcome.cursor.as_deref(), Some("grab"));
    let (phase, delta, uv) = seen.borrow().unwrap();
    assert_eq!(phase, Phase::Up);
    assert_eq!(delta, Some(12.0));
    assert!(uv <= 1.0 + 1e-9);
}

#[test]
fn culling_config_applies_to_dispatch() {
    let r = router();
    r.borrow_mut().register("a", square(0.0, 0.0, 0.5, 0.0));
    r.borrow_mut().set_config(RouterConfig {
        cull_face: crate::event::geometry::FaceCulling::Back,
        ..RouterConfig::default()
    });
    assert!(r.borrow_mut().dispatch(&at(EventKind::Click, 0.0, 0.0)).hits.is_empty());
}
