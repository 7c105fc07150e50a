use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::PageResult;
use crate::foundation::math::Mat4;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};
use crate::transform::provider::{TransformCache, TransformProvider, Upstream};

#[derive(Clone, Debug)]
pub struct MatrixParams {
    /// Local matrix, row-major.
    pub matrix: Value<Mat4>,
    pub upstream: Upstream,
    pub instant_calculate: Value<bool>,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            matrix: Value::Literal(Mat4::IDENTITY),
            upstream: Upstream::default(),
            instant_calculate: Value::Literal(true),
        }
    }
}

/// Transform node with a caller-supplied local matrix (projections, skews, ...).
pub struct MatrixNode {
    base: NodeBase,
    local: Value<Mat4>,
    cache: TransformCache,
}

impl NodeKind for MatrixNode {
    type Params = MatrixParams;
    const TYPE_NAME: &'static str = "matrix";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let mut node = Self {
            base,
            local: params.matrix,
            cache: TransformCache::new(params.upstream),
        };
        if node.base.enabled() && params.instant_calculate.resolve() {
            node.calculate();
        }
        Ok(node)
    }
}

impl MatrixNode {
    pub fn calculate(&mut self) -> Mat4 {
        self.cache.store(self.local.resolve());
        self.cache.cached()
    }

    pub fn cached_matrix(&self) -> Mat4 {
        self.cache.cached()
    }

    pub fn set_local(&mut self, matrix: impl Into<Value<Mat4>>) {
        self.local = matrix.into();
    }
}

impl Node for MatrixNode {
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

impl TransformProvider for MatrixNode {
    fn matrix(&self) -> Mat4 {
        self.cache.matrix(self.base.enabled())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/matrix.rs"]
mod tests;
