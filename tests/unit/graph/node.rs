use std::cell::Cell;

use super::*;
use crate::graph::scheduler::GraphParams;

#[test]
fn ids_are_monotonic_and_start_at_one() {
    let ids = IdAllocator::default();
    assert_eq!(ids.next_id(), NodeId(1));
    assert_eq!(ids.next_id(), NodeId(2));

    let shared = ids.clone();
    assert_eq!(shared.next_id(), NodeId(3));
    assert_eq!(ids.next_id(), NodeId(4));
}

#[test]
fn base_name_falls_back_to_type_and_id() {
    let base = NodeBase::new(NodeId(5), "translate", NodeOpts::default());
    assert_eq!(base.name(), "translate#5");

    let named = NodeBase::new(NodeId(6), "translate", NodeOpts::named("offset"));
    assert_eq!(named.name(), "offset");
}

#[test]
fn should_update_needs_both_flags() {
    let flag = Rc::new(Cell::new(true));
    let f = Rc::clone(&flag);
    let mut base = NodeBase::new(
        NodeId(1),
        "sample",
        NodeOpts::default().with_update(Value::computed(move || f.get())),
    );
    assert!(base.should_update());
    flag.set(false);
    assert!(base.enabled());
    assert!(!base.should_update());
    flag.set(true);
    base.set_enable(false);
    assert!(!base.should_update());
}

#[test]
fn hooks_run_when_asked() {
    let calls = Rc::new(Cell::new(0));
    let (a, b) = (Rc::clone(&calls), Rc::clone(&calls));
    let base = NodeBase::new(
        NodeId(1),
        "sample",
        NodeOpts::default()
            .with_setup(move || a.set(a.get() + 1))
            .with_cleanup(move || b.set(b.get() + 10)),
    );
    base.run_setup();
    base.run_cleanup();
    assert_eq!(calls.get(), 11);
}

#[test]
fn parents_of_merges_and_dedups() {
    let ctx = BuildCtx::default();
    let graph = instantiate::<GraphNode>(
        &ctx,
        NodeOpts::default().with_parents([NodeId(9), NodeId(3), NodeId(9)]),
        GraphParams::default(),
    )
    .unwrap();
    assert_eq!(parents_of(&*graph.borrow()), vec![NodeId(9), NodeId(3)]);
}

#[test]
fn handle_views_share_the_node() {
    let ctx = BuildCtx::default();
    let graph = instantiate::<GraphNode>(&ctx, NodeOpts::default(), GraphParams::default()).unwrap();
    let erased = graph.as_node();
    assert_eq!(erased.id(), graph.id());

    erased.borrow_mut().base_mut().set_name("renamed");
    assert_eq!(graph.borrow().base().name(), "renamed");

    let _guard = graph.borrow_mut();
    assert!(erased.try_borrow().is_none());
}
