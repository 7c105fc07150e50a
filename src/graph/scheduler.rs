use std::collections::BTreeMap;

use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::{PageError, PageResult};
use crate::graph::frame::FrameCtx;
use crate::graph::node::{
    BuildCtx, Handle, Node, NodeBase, NodeKind, NodeOpts, NodeRef, instantiate, parents_of,
};
use crate::render::surface::ClearMask;

/// Parameters for [`GraphNode`].
#[derive(Clone, Debug, Default)]
pub struct GraphParams {
    /// Clear colour, depth and stencil on the surface before drawing.
    pub clear: Value<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Unvisited,
    InProgress,
    Done,
}

struct GraphEntry {
    node: NodeRef,
    children: Vec<usize>,
}

/// Registry + topological sort + per-frame driver for a set of nodes.
///
/// Nodes live in an arena indexed by registration order; traversal state is kept in a parallel
/// array owned by [`GraphNode::sort`], never on the nodes.
pub struct GraphNode {
    base: NodeBase,
    clear: Value<bool>,
    build: BuildCtx,
    entries: Vec<GraphEntry>,
    index_by_id: BTreeMap<NodeId, usize>,
    sorted: Vec<usize>,
}

impl NodeKind for GraphNode {
    type Params = GraphParams;
    const TYPE_NAME: &'static str = "graph";

    fn build(base: NodeBase, params: Self::Params, ctx: &BuildCtx) -> PageResult<Self> {
        Ok(Self {
            base,
            clear: params.clear,
            build: ctx.clone(),
            entries: Vec::new(),
            index_by_id: BTreeMap::new(),
            sorted: Vec::new(),
        })
    }
}

impl GraphNode {
    /// Create a node of kind `K`, register it in this graph and return its handle.
    pub fn create_node<K: NodeKind>(&mut self, params: K::Params) -> PageResult<Handle<K>> {
        self.create_node_with::<K>(NodeOpts::default(), params)
    }

    pub fn create_node_with<K: NodeKind>(
        &mut self,
        opts: NodeOpts,
        params: K::Params,
    ) -> PageResult<Handle<K>> {
        let handle = instantiate::<K>(&self.build, opts, params)?;
        self.register(handle.as_node());
        tracing::trace!(graph = %self.base.id(), node = %handle.id(), kind = K::TYPE_NAME, "node created");
        Ok(handle)
    }

    /// Register a node created elsewhere (e.g. by the page root). Re-registering is a no-op.
    pub fn register(&mut self, node: NodeRef) {
        if self.index_by_id.contains_key(&node.id()) {
            return;
        }
        self.index_by_id.insert(node.id(), self.entries.len());
        self.entries.push(GraphEntry {
            node,
            children: Vec::new(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    /// Ids in the current update order (empty until [`GraphNode::sort`] succeeds).
    pub fn sorted_ids(&self) -> Vec<NodeId> {
        self.sorted.iter().map(|&i| self.entries[i].node.id()).collect()
    }

    /// Compute the dependency order, then sort nested graphs in that order.
    #[tracing::instrument(skip(self), fields(graph = %self.base.id(), nodes = self.entries.len()))]
    pub fn sort(&mut self) -> PageResult<()> {
        self.sorted.clear();
        for entry in &mut self.entries {
            entry.children.clear();
        }

        for child in 0..self.entries.len() {
            let parents = parents_of(&*self.entries[child].node.borrow());
            for parent_id in parents {
                // Parents outside this graph are updated by whoever owns them.
                let Some(&parent) = self.index_by_id.get(&parent_id) else {
                    continue;
                };
                let children = &mut self.entries[parent].children;
                if !children.contains(&child) {
                    children.push(child);
                }
            }
        }

        let mut stage = vec![Stage::Unvisited; self.entries.len()];
        let mut post_order = Vec::with_capacity(self.entries.len());
        let mut path = Vec::new();
        for start in 0..self.entries.len() {
            self.visit(start, &mut stage, &mut post_order, &mut path)?;
        }
        post_order.reverse();
        self.sorted = post_order;

        tracing::debug!(order = ?self.sorted_ids(), "graph sorted");

        for &i in &self.sorted {
            let mut node = self.entries[i].node.borrow_mut();
            if let Some(graph) = node.as_graph_mut() {
                graph.sort()?;
            }
        }
        Ok(())
    }

    /// Depth-first post-order from `start` on an explicit stack of `(node, next child)` frames.
    ///
    /// `path` mirrors the nodes currently in progress, so a back edge can name the whole cycle.
    fn visit(
        &self,
        start: usize,
        stage: &mut [Stage],
        post_order: &mut Vec<usize>,
        path: &mut Vec<usize>,
    ) -> PageResult<()> {
        if stage[start] != Stage::Unvisited {
            return Ok(());
        }
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        stage[start] = Stage::InProgress;
        path.push(start);

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&child) = self.entries[node].children.get(cursor) else {
                stack.pop();
                path.pop();
                stage[node] = Stage::Done;
                post_order.push(node);
                continue;
            };
            frame.1 += 1;
            match stage[child] {
                Stage::Done => {}
                Stage::InProgress => return Err(self.cycle_error(path, child)),
                Stage::Unvisited => {
                    stage[child] = Stage::InProgress;
                    path.push(child);
                    stack.push((child, 0));
                }
            }
        }
        Ok(())
    }

    fn cycle_error(&self, path: &[usize], repeated: usize) -> PageError {
        let pos = path.iter().position(|&p| p == repeated).unwrap_or(0);
        let mut names: Vec<String> = path[pos..].iter().map(|&p| self.describe(p)).collect();
        names.push(self.describe(repeated));
        let msg = format!("cycle between nodes: {}", names.join(" -> "));
        tracing::error!(graph = %self.base.id(), "{msg}");
        PageError::cycle(msg)
    }

    fn describe(&self, i: usize) -> String {
        let node = &self.entries[i].node;
        match node.try_borrow().map(|n| n.base().name()) {
            Some(name) => format!("{name}({})", node.id()),
            None => node.id().to_string(),
        }
    }

    /// Optionally clear the surface, then run each enabled node's update hook in sorted order.
    pub fn draw(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.clear.resolve() {
            ctx.surface.clear(ClearMask::ALL);
        }
        for &i in &self.sorted {
            let entry = &self.entries[i];
            let mut node = entry.node.borrow_mut();
            if !node.base().enabled() {
                continue;
            }
            tracing::trace!(node = %entry.node.id(), kind = node.base().type_name(), "update");
            node.update(ctx)?;
        }
        Ok(())
    }

    pub fn set_clear(&mut self, clear: impl Into<Value<bool>>) {
        self.clear = clear.into();
    }
}

impl Node for GraphNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if !self.base.enabled() {
            return Ok(());
        }
        self.base.run_setup();
        let res = self.draw(ctx);
        self.base.run_cleanup();
        res
    }

    fn as_graph_mut(&mut self) -> Option<&mut GraphNode> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/scheduler.rs"]
mod tests;
