use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::PageResult;
use crate::graph::emitter::Emitter;
use crate::graph::frame::FrameCtx;
use crate::graph::scheduler::GraphNode;
use crate::render::drawable::SizedDrawable;
use crate::transform::provider::TransformProvider;

/// Hook run before or after a node recomputes.
pub type Hook = Rc<dyn Fn()>;

/// Shared monotonic id source. Every graph created under one page root uses the same allocator.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next: Rc<Cell<u64>>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: Rc::new(Cell::new(1)),
        }
    }
}

impl IdAllocator {
    pub fn next_id(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }
}

/// Options shared by every node kind.
#[derive(Clone)]
pub struct NodeOpts {
    pub name: Option<Value<String>>,
    pub enable: Value<bool>,
    pub update: Value<bool>,
    pub parent_nodes: Vec<NodeId>,
    pub setup: Option<Hook>,
    pub cleanup: Option<Hook>,
}

impl Default for NodeOpts {
    fn default() -> Self {
        Self {
            name: None,
            enable: Value::Literal(true),
            update: Value::Literal(true),
            parent_nodes: Vec::new(),
            setup: None,
            cleanup: None,
        }
    }
}

impl NodeOpts {
    pub fn named(name: impl Into<Value<String>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_enable(mut self, enable: impl Into<Value<bool>>) -> Self {
        self.enable = enable.into();
        self
    }

    pub fn with_update(mut self, update: impl Into<Value<bool>>) -> Self {
        self.update = update.into();
        self
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = NodeId>) -> Self {
        self.parent_nodes.extend(parents);
        self
    }

    pub fn with_setup(mut self, hook: impl Fn() + 'static) -> Self {
        self.setup = Some(Rc::new(hook));
        self
    }

    pub fn with_cleanup(mut self, hook: impl Fn() + 'static) -> Self {
        self.cleanup = Some(Rc::new(hook));
        self
    }
}

/// State common to every node: identity, flags, declared parents, hooks and events.
pub struct NodeBase {
    id: NodeId,
    type_name: &'static str,
    name: Option<Value<String>>,
    enable: Value<bool>,
    update: Value<bool>,
    parent_nodes: Vec<NodeId>,
    setup: Option<Hook>,
    cleanup: Option<Hook>,
    events: Emitter,
}

impl NodeBase {
    pub fn new(id: NodeId, type_name: &'static str, opts: NodeOpts) -> Self {
        Self {
            id,
            type_name,
            name: opts.name,
            enable: opts.enable,
            update: opts.update,
            parent_nodes: opts.parent_nodes,
            setup: opts.setup,
            cleanup: opts.cleanup,
            events: Emitter::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolved display name, falling back to `<type>#<id>`.
    pub fn name(&self) -> String {
        match &self.name {
            Some(v) => v.resolve(),
            None => format!("{}{}", self.type_name, self.id),
        }
    }

    pub fn set_name(&mut self, name: impl Into<Value<String>>) {
        self.name = Some(name.into());
    }

    pub fn enabled(&self) -> bool {
        self.enable.resolve()
    }

    pub fn set_enable(&mut self, enable: impl Into<Value<bool>>) {
        self.enable = enable.into();
    }

    pub fn update_flag(&self) -> bool {
        self.update.resolve()
    }

    pub fn set_update(&mut self, update: impl Into<Value<bool>>) {
        self.update = update.into();
    }

    /// `enable && update`: the gate a node applies before recomputing on its turn.
    pub fn should_update(&self) -> bool {
        self.enabled() && self.update_flag()
    }

    pub fn parent_nodes(&self) -> &[NodeId] {
        &self.parent_nodes
    }

    pub fn add_parent_nodes(&mut self, parents: impl IntoIterator<Item = NodeId>) -> &mut Self {
        self.parent_nodes.extend(parents);
        self
    }

    pub fn run_setup(&self) {
        if let Some(hook) = &self.setup {
            hook();
        }
    }

    pub fn run_cleanup(&self) {
        if let Some(hook) = &self.cleanup {
            hook();
        }
    }

    pub fn events(&self) -> &Emitter {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Emitter {
        &mut self.events
    }
}

impl fmt::Debug for NodeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBase")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("enable", &self.enable)
            .field("update", &self.update)
            .field("parent_nodes", &self.parent_nodes)
            .finish_non_exhaustive()
    }
}

/// Smallest schedulable unit of the scene graph.
pub trait Node {
    fn base(&self) -> &NodeBase;

    fn base_mut(&mut self) -> &mut NodeBase;

    /// Ids of node-valued properties (upstream transforms, sized objects, routers).
    ///
    /// Together with [`NodeBase::parent_nodes`] these are the node's dependencies.
    fn linked_nodes(&self) -> Vec<NodeId> {
        Vec::new()
    }

    /// Per-frame hook, invoked by the owning graph in dependency order.
    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()>;

    /// Nested graphs expose themselves so the outer graph can sort them recursively.
    fn as_graph_mut(&mut self) -> Option<&mut GraphNode> {
        None
    }
}

/// Dependencies of a node: node-valued properties first, then explicit parents, deduplicated.
pub fn parents_of(node: &dyn Node) -> Vec<NodeId> {
    let mut out = node.linked_nodes();
    out.extend_from_slice(node.base().parent_nodes());
    let mut seen = std::collections::BTreeSet::new();
    out.retain(|id| seen.insert(*id));
    out
}

/// Construction context handed to [`NodeKind::build`].
#[derive(Clone, Debug, Default)]
pub struct BuildCtx {
    ids: IdAllocator,
}

impl BuildCtx {
    pub fn new(ids: IdAllocator) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }
}

/// A node type that graphs and the page root know how to instantiate.
pub trait NodeKind: Node + Sized + 'static {
    type Params;

    /// Stable type name used for default names, logs and errors.
    const TYPE_NAME: &'static str;

    fn build(base: NodeBase, params: Self::Params, ctx: &BuildCtx) -> PageResult<Self>;
}

/// Instantiate a node of kind `K` with a fresh id.
pub(crate) fn instantiate<K: NodeKind>(
    ctx: &BuildCtx,
    opts: NodeOpts,
    params: K::Params,
) -> PageResult<Handle<K>> {
    let base = NodeBase::new(ctx.ids().next_id(), K::TYPE_NAME, opts);
    let node = K::build(base, params, ctx)?;
    Ok(Handle::new(node))
}

/// Shared, single-threaded handle to a node.
///
/// The id is cached on the handle so dependency discovery never needs to borrow the node.
pub struct Handle<K: ?Sized> {
    id: NodeId,
    cell: Rc<RefCell<K>>,
}

/// Type-erased node handle, as stored by graphs.
pub type NodeRef = Handle<dyn Node>;
/// Handle to anything that produces a matrix.
pub type TransformLink = Handle<dyn TransformProvider>;
/// Handle to anything with a width and height.
pub type SizedLink = Handle<dyn SizedDrawable>;

impl<K: ?Sized> Clone for Handle<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<K: ?Sized> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<K: ?Sized> Handle<K> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Panics if the node is currently mutably borrowed (e.g. borrowed from inside its own update).
    pub fn borrow(&self) -> Ref<'_, K> {
        self.cell.borrow()
    }

    /// `None` while the node is mutably borrowed.
    pub fn try_borrow(&self) -> Option<Ref<'_, K>> {
        self.cell.try_borrow().ok()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, K> {
        self.cell.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<K: Node + 'static> Handle<K> {
    pub(crate) fn new(node: K) -> Self {
        Self {
            id: node.base().id(),
            cell: Rc::new(RefCell::new(node)),
        }
    }

    pub fn as_node(&self) -> NodeRef {
        let cell: Rc<RefCell<dyn Node>> = self.cell.clone();
        Handle { id: self.id, cell }
    }
}

impl<K: TransformProvider + 'static> Handle<K> {
    pub fn as_transform(&self) -> TransformLink {
        let cell: Rc<RefCell<dyn TransformProvider>> = self.cell.clone();
        Handle { id: self.id, cell }
    }
}

impl<K: SizedDrawable + 'static> Handle<K> {
    pub fn as_sized(&self) -> SizedLink {
        let cell: Rc<RefCell<dyn SizedDrawable>> = self.cell.clone();
        Handle { id: self.id, cell }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/node.rs"]
mod tests;
