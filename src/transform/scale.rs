use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::PageResult;
use crate::foundation::math::Mat4;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};
use crate::transform::provider::{TransformCache, TransformProvider, Upstream};

#[derive(Clone, Debug)]
pub struct ScaleParams {
    pub x: Value<f64>,
    pub y: Value<f64>,
    pub z: Value<f64>,
    pub upstream: Upstream,
    /// Compute the matrix at construction when the node is enabled.
    pub instant_calculate: Value<bool>,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self {
            x: Value::Literal(1.0),
            y: Value::Literal(1.0),
            z: Value::Literal(1.0),
            upstream: Upstream::default(),
            instant_calculate: Value::Literal(true),
        }
    }
}

impl ScaleParams {
    pub fn new(x: impl Into<Value<f64>>, y: impl Into<Value<f64>>, z: impl Into<Value<f64>>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
            ..Self::default()
        }
    }

    /// Same factor on x and y; z stays 1.
    pub fn uniform(s: impl Into<Value<f64>>) -> Self {
        let s = s.into();
        Self {
            x: s.clone(),
            y: s,
            ..Self::default()
        }
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = upstream;
        self
    }
}

/// Non-uniform scale about the origin.
pub struct ScaleNode {
    base: NodeBase,
    x: Value<f64>,
    y: Value<f64>,
    z: Value<f64>,
    cache: TransformCache,
}

impl NodeKind for ScaleNode {
    type Params = ScaleParams;
    const TYPE_NAME: &'static str = "scale";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let mut node = Self {
            base,
            x: params.x,
            y: params.y,
            z: params.z,
            cache: TransformCache::new(params.upstream),
        };
        if node.base.enabled() && params.instant_calculate.resolve() {
            node.calculate();
        }
        Ok(node)
    }
}

impl ScaleNode {
    /// Recompute `scale(x, y, z) * upstream`.
    pub fn calculate(&mut self) -> Mat4 {
        let local = Mat4::scale(self.x.resolve(), self.y.resolve(), self.z.resolve());
        self.cache.store(local);
        self.cache.cached()
    }

    /// Last computed matrix, regardless of `enable`.
    pub fn cached_matrix(&self) -> Mat4 {
        self.cache.cached()
    }

    pub fn set_xyz(
        &mut self,
        x: impl Into<Value<f64>>,
        y: impl Into<Value<f64>>,
        z: impl Into<Value<f64>>,
    ) {
        self.x = x.into();
        self.y = y.into();
        self.z = z.into();
    }

    pub fn upstream(&self) -> &Upstream {
        self.cache.upstream()
    }

    pub fn set_upstream(&mut self, upstream: Upstream) {
        self.cache.set_upstream(upstream);
    }
}

impl Node for ScaleNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn linked_nodes(&self) -> Vec<NodeId> {
        self.cache.linked()
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

impl TransformProvider for ScaleNode {
    fn matrix(&self) -> Mat4 {
        self.cache.matrix(self.base.enabled())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/scale.rs"]
mod tests;
