use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::render::programs::ProgramCache;
use crate::render::surface::{RecordingSurface, SurfaceCommand};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    base: NodeBase,
    log: Log,
}

impl NodeKind for Recorder {
    type Params = Log;
    const TYPE_NAME: &'static str = "recorder";

    fn build(base: NodeBase, log: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        Ok(Self { base, log })
    }
}

impl Node for Recorder {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, _ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.base.should_update() {
            self.log.borrow_mut().push(self.base.name());
        }
        Ok(())
    }
}

fn graph() -> Handle<GraphNode> {
    instantiate::<GraphNode>(&BuildCtx::default(), NodeOpts::default(), GraphParams::default())
        .unwrap()
}

fn recorder(g: &Handle<GraphNode>, name: &str, log: &Log) -> Handle<Recorder> {
    g.borrow_mut()
        .create_node_with::<Recorder>(NodeOpts::named(name), Rc::clone(log))
        .unwrap()
}

fn add_parents(node: &Handle<Recorder>, parents: &[&Handle<Recorder>]) {
    node.borrow_mut()
        .base_mut()
        .add_parent_nodes(parents.iter().map(|p| p.id()));
}

fn run(g: &Handle<GraphNode>) -> RecordingSurface {
    let mut surface = RecordingSurface::new(64.0, 64.0);
    let mut programs = ProgramCache::new();
    let mut ctx = FrameCtx::new(&mut surface, &mut programs);
    g.borrow_mut().update(&mut ctx).unwrap();
    surface
}

fn position(order: &[NodeId], id: NodeId) -> usize {
    order.iter().position(|&x| x == id).unwrap()
}

#[test]
fn parents_come_before_children() {
    let log = Log::default();
    let g = graph();
    // Registered child-first so registration order cannot satisfy the constraints by accident.
    let d = recorder(&g, "d", &log);
    let c = recorder(&g, "c", &log);
    let b = recorder(&g, "b", &log);
    let a = recorder(&g, "a", &log);
    add_parents(&b, &[&a]);
    add_parents(&c, &[&a]);
    add_parents(&d, &[&b, &c]);

    g.borrow_mut().sort().unwrap();
    let order = g.borrow().sorted_ids();
    assert_eq!(order.len(), 4);
    assert!(position(&order, a.id()) < position(&order, b.id()));
    assert!(position(&order, a.id()) < position(&order, c.id()));
    assert!(position(&order, b.id()) < position(&order, d.id()));
    assert!(position(&order, c.id()) < position(&order, d.id()));

    run(&g);
    let seen = log.borrow();
    assert_eq!(seen.first().map(String::as_str), Some("a"));
    assert_eq!(seen.last().map(String::as_str), Some("d"));
}

#[test]
fn cycle_is_reported_with_node_names() {
    let log = Log::default();
    let g = graph();
    let a = recorder(&g, "a", &log);
    let b = recorder(&g, "b", &log);
    add_parents(&a, &[&b]);
    add_parents(&b, &[&a]);

    let err = g.borrow_mut().sort().unwrap_err();
    assert!(err.is_cycle());
    let msg = err.to_string();
    assert!(msg.contains('a') && msg.contains('b'), "{msg}");
    assert!(g.borrow().sorted_ids().is_empty());
}

#[test]
fn self_dependency_is_a_cycle() {
    let log = Log::default();
    let g = graph();
    let a = recorder(&g, "a", &log);
    add_parents(&a, &[&a]);
    assert!(g.borrow_mut().sort().unwrap_err().is_cycle());
}

#[test]
fn parents_outside_the_graph_are_ignored() {
    let log = Log::default();
    let g = graph();
    let a = recorder(&g, "a", &log);
    a.borrow_mut().base_mut().add_parent_nodes([NodeId(999)]);
    g.borrow_mut().sort().unwrap();
    assert_eq!(g.borrow().sorted_ids(), vec![a.id()]);
}

#[test]
fn register_is_idempotent() {
    let log = Log::default();
    let g = graph();
    let a = recorder(&g, "a", &log);
    g.borrow_mut().register(a.as_node());
    assert_eq!(g.borrow().len(), 1);
    assert!(g.borrow().contains(a.id()));
}

#[test]
fn nested_graphs_are_sorted_and_updated() {
    let log = Log::default();
    let outer = graph();
    let inner = outer
        .borrow_mut()
        .create_node::<GraphNode>(GraphParams::default())
        .unwrap();
    let leaf = inner
        .borrow_mut()
        .create_node_with::<Recorder>(NodeOpts::named("leaf"), Rc::clone(&log))
        .unwrap();

    outer.borrow_mut().sort().unwrap();
    assert_eq!(inner.borrow().sorted_ids(), vec![leaf.id()]);

    run(&outer);
    assert_eq!(*log.borrow(), vec!["leaf"]);
}

#[test]
fn disabled_and_frozen_nodes_are_skipped() {
    let log = Log::default();
    let g = graph();
    let on = recorder(&g, "on", &log);
    let off = recorder(&g, "off", &log);
    let frozen = recorder(&g, "frozen", &log);
    off.borrow_mut().base_mut().set_enable(false);
    frozen.borrow_mut().base_mut().set_update(false);
    let _ = on;

    g.borrow_mut().sort().unwrap();
    run(&g);
    assert_eq!(*log.borrow(), vec!["on"]);
}

#[test]
fn disabled_graph_does_nothing() {
    let log = Log::default();
    let g = graph();
    recorder(&g, "a", &log);
    g.borrow_mut().set_clear(true);
    g.borrow_mut().base_mut().set_enable(false);
    g.borrow_mut().sort().unwrap();
    let surface = run(&g);
    assert!(log.borrow().is_empty());
    assert!(surface.commands().is_empty());
}

#[test]
fn clear_flag_clears_before_children_draw() {
    let log = Log::default();
    let g = graph();
    recorder(&g, "a", &log);
    g.borrow_mut().set_clear(true);
    g.borrow_mut().sort().unwrap();
    let surface = run(&g);
    assert!(matches!(
        surface.commands().first(),
        Some(SurfaceCommand::Clear(mask)) if *mask == ClearMask::ALL
    ));
}

#[test]
fn setup_and_cleanup_wrap_the_children() {
    let log = Log::default();
    let (s, c) = (Rc::clone(&log), Rc::clone(&log));
    let g = instantiate::<GraphNode>(
        &BuildCtx::default(),
        NodeOpts::default()
            .with_setup(move || s.borrow_mut().push("setup".into()))
            .with_cleanup(move || c.borrow_mut().push("cleanup".into())),
        GraphParams::default(),
    )
    .unwrap();
    recorder(&g, "child", &log);
    g.borrow_mut().sort().unwrap();
    run(&g);
    assert_eq!(*log.borrow(), vec!["setup", "child", "cleanup"]);
}

#[test]
fn resorting_picks_up_new_edges() {
    let log = Log::default();
    let g = graph();
    let a = recorder(&g, "a", &log);
    let b = recorder(&g, "b", &log);
    g.borrow_mut().sort().unwrap();
    assert_eq!(g.borrow().sorted_ids().len(), 2);

    add_parents(&a, &[&b]);
    g.borrow_mut().sort().unwrap();
    let order = g.borrow().sorted_ids();
    assert!(position(&order, b.id()) < position(&order, a.id()));
}

fn chain(g: &Handle<GraphNode>, len: usize, log: &Log) -> Vec<Handle<Recorder>> {
    let mut nodes: Vec<Handle<Recorder>> = Vec::with_capacity(len);
    for _ in 0..len {
        let node = g
            .borrow_mut()
            .create_node::<Recorder>(Rc::clone(log))
            .unwrap();
        if let Some(prev) = nodes.last() {
            add_parents(&node, &[prev]);
        }
        nodes.push(node);
    }
    nodes
}

#[test]
fn long_chain_sorts_without_recursion() {
    let log = Log::default();
    let g = graph();
    let nodes = chain(&g, 20_000, &log);

    g.borrow_mut().sort().unwrap();
    let order = g.borrow().sorted_ids();
    let expected: Vec<NodeId> = nodes.iter().map(|n| n.id()).collect();
    assert_eq!(order, expected);
}

#[test]
fn long_ring_is_a_cycle() {
    let log = Log::default();
    let g = graph();
    let nodes = chain(&g, 12_000, &log);
    let (first, last) = (&nodes[0], &nodes[nodes.len() - 1]);
    add_parents(first, &[last]);

    let err = g.borrow_mut().sort().unwrap_err();
    assert!(err.is_cycle());
    assert!(g.borrow().sorted_ids().is_empty());
}
