use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::{PageError, PageResult};
use crate::foundation::math::Mat4;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind, SizedLink, TransformLink};
use crate::transform::pivot::{AnchorX, AnchorY, pivot_matrix};
use crate::transform::rotate::euler_matrix;

/// Local operation of one forest record.
#[derive(Clone, Debug)]
pub enum ForestOp {
    /// Matrix of a linked transform node; identity when unbound.
    Node(Option<TransformLink>),
    /// Literal matrix; identity when absent.
    Matrix(Option<Value<Mat4>>),
    PivotPoint {
        x: AnchorX,
        y: AnchorY,
        object: Option<SizedLink>,
    },
    Scale {
        x: Value<f64>,
        y: Value<f64>,
        z: Value<f64>,
    },
    Rotate {
        x: Value<f64>,
        y: Value<f64>,
        z: Value<f64>,
        radians: Value<bool>,
    },
    Translate {
        x: Value<f64>,
        y: Value<f64>,
        z: Value<f64>,
    },
}

impl ForestOp {
    fn local(&self) -> Mat4 {
        match self {
            Self::Node(node) => node
                .as_ref()
                .map_or(Mat4::IDENTITY, |n| n.borrow().matrix()),
            Self::Matrix(m) => m.as_ref().map_or(Mat4::IDENTITY, Value::resolve),
            Self::PivotPoint { x, y, object } => {
                let size = object.as_ref().map(|o| {
                    let o = o.borrow();
                    (o.width(), o.height())
                });
                pivot_matrix(x, y, size)
            }
            Self::Scale { x, y, z } => Mat4::scale(x.resolve(), y.resolve(), z.resolve()),
            Self::Rotate { x, y, z, radians } => {
                euler_matrix(x.resolve(), y.resolve(), z.resolve(), radians.resolve())
            }
            Self::Translate { x, y, z } => Mat4::translate(x.resolve(), y.resolve(), z.resolve()),
        }
    }

    fn linked(&self) -> Option<NodeId> {
        match self {
            Self::Node(Some(n)) => Some(n.id()),
            Self::PivotPoint {
                object: Some(o), ..
            } => Some(o.id()),
            _ => None,
        }
    }
}

/// One record of a forest declaration, with its subtree.
#[derive(Clone, Debug)]
pub struct ForestRecord {
    /// `None` gets an auto-generated `record-<n>` name.
    pub name: Option<String>,
    pub enable: Value<bool>,
    pub op: ForestOp,
    pub children: Vec<ForestRecord>,
}

impl ForestRecord {
    pub fn new(op: ForestOp) -> Self {
        Self {
            name: None,
            enable: Value::Literal(true),
            op,
            children: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, op: ForestOp) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(op)
        }
    }

    pub fn translate(x: f64, y: f64, z: f64) -> ForestOp {
        ForestOp::Translate {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    pub fn scale(x: f64, y: f64, z: f64) -> ForestOp {
        ForestOp::Scale {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    pub fn with_enable(mut self, enable: impl Into<Value<bool>>) -> Self {
        self.enable = enable.into();
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ForestRecord>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ForestParams {
    pub records: Vec<ForestRecord>,
    pub instant_calculate: Value<bool>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            instant_calculate: Value::Literal(true),
        }
    }
}

impl ForestParams {
    pub fn new(records: impl IntoIterator<Item = ForestRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            ..Self::default()
        }
    }
}

struct Slot {
    name: String,
    enable: Value<bool>,
    op: ForestOp,
    parent: Option<usize>,
    local: Mat4,
    world: Mat4,
}

/// Batch evaluation of named transform trees.
///
/// Records are flattened in pre-order; a record's final matrix is its local matrix followed by
/// each ancestor's local matrix up to the root: `local(r) * local(parent) * ... * local(root)`.
pub struct TransformForest {
    base: NodeBase,
    slots: Vec<Slot>,
    by_name: BTreeMap<String, usize>,
}

impl NodeKind for TransformForest {
    type Params = ForestParams;
    const TYPE_NAME: &'static str = "transformforest";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let mut taken = BTreeSet::new();
        collect_names(&params.records, &mut taken)?;

        let mut forest = Self {
            base,
            slots: Vec::new(),
            by_name: BTreeMap::new(),
        };
        let mut auto = 0usize;
        for record in params.records {
            forest.flatten(record, None, &taken, &mut auto);
        }

        if forest.base.enabled() && params.instant_calculate.resolve() {
            forest.base.run_setup();
            forest.calculate();
            forest.base.run_cleanup();
        }
        Ok(forest)
    }
}

fn collect_names(records: &[ForestRecord], taken: &mut BTreeSet<String>) -> PageResult<()> {
    for record in records {
        if let Some(name) = &record.name
            && !taken.insert(name.clone())
        {
            return Err(PageError::validation(format!(
                "duplicate transform forest record name '{name}'"
            )));
        }
        collect_names(&record.children, taken)?;
    }
    Ok(())
}

impl TransformForest {
    fn flatten(
        &mut self,
        record: ForestRecord,
        parent: Option<usize>,
        taken: &BTreeSet<String>,
        auto: &mut usize,
    ) {
        let name = match record.name {
            Some(name) => name,
            None => loop {
                *auto += 1;
                let candidate = format!("record-{auto}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
            },
        };
        let index = self.slots.len();
        self.by_name.insert(name.clone(), index);
        self.slots.push(Slot {
            name,
            enable: record.enable,
            op: record.op,
            parent,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        });
        for child in record.children {
            self.flatten(child, Some(index), taken, auto);
        }
    }

    /// Recompute every local matrix, then every accumulated matrix.
    ///
    /// Disabled records contribute identity; their children still compose.
    #[tracing::instrument(skip(self), fields(forest = %self.base.id(), records = self.slots.len()))]
    pub fn calculate(&mut self) -> &mut Self {
        for slot in &mut self.slots {
            slot.local = if slot.enable.resolve() {
                slot.op.local()
            } else {
                Mat4::IDENTITY
            };
        }
        for i in 0..self.slots.len() {
            let mut m = self.slots[i].local;
            let mut cursor = self.slots[i].parent;
            while let Some(p) = cursor {
                m = m * self.slots[p].local;
                cursor = self.slots[p].parent;
            }
            self.slots[i].world = m;
        }
        self
    }

    /// Final matrix of `name`; identity when the forest is disabled or the name is unknown.
    pub fn matrix(&self, name: &str) -> Mat4 {
        if !self.base.enabled() {
            return Mat4::IDENTITY;
        }
        match self.by_name.get(name) {
            Some(&i) => self.slots[i].world,
            None => {
                tracing::warn!(forest = %self.base.id(), name, "unknown transform forest record");
                Mat4::IDENTITY
            }
        }
    }

    /// Record names in declaration (pre-order) order, auto-generated ones included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

impl Node for TransformForest {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn linked_nodes(&self) -> Vec<NodeId> {
        self.slots.iter().filter_map(|s| s.op.linked()).collect()
    }

    fn update(&mut self, _ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.base.should_update() {
            self.base.run_setup();
            self.calculate();
            self.base.run_cleanup();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/forest.rs"]
mod tests;
