use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::PageResult;
use crate::foundation::math::Mat4;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};
use crate::transform::provider::{TransformCache, TransformProvider, Upstream};

/// Euler X-Y-Z rotation local matrix. Angles are degrees unless `radians` is set.
pub fn euler_matrix(x: f64, y: f64, z: f64, radians: bool) -> Mat4 {
    if radians {
        Mat4::rotate_xyz(x, y, z)
    } else {
        Mat4::rotate_xyz(x.to_radians(), y.to_radians(), z.to_radians())
    }
}

#[derive(Clone, Debug)]
pub struct RotateParams {
    pub x: Value<f64>,
    pub y: Value<f64>,
    pub z: Value<f64>,
    pub radians: Value<bool>,
    pub upstream: Upstream,
    pub instant_calculate: Value<bool>,
}

impl Default for RotateParams {
    fn default() -> Self {
        Self {
            x: Value::Literal(0.0),
            y: Value::Literal(0.0),
            z: Value::Literal(0.0),
            radians: Value::Literal(false),
            upstream: Upstream::default(),
            instant_calculate: Value::Literal(true),
        }
    }
}

impl RotateParams {
    /// Rotation about the z axis only, in degrees.
    pub fn z_degrees(z: impl Into<Value<f64>>) -> Self {
        Self {
            z: z.into(),
            ..Self::default()
        }
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = upstream;
        self
    }
}

pub struct RotateNode {
    base: NodeBase,
    x: Value<f64>,
    y: Value<f64>,
    z: Value<f64>,
    radians: Value<bool>,
    cache: TransformCache,
}

impl NodeKind for RotateNode {
    type Params = RotateParams;
    const TYPE_NAME: &'static str = "rotate";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let mut node = Self {
            base,
            x: params.x,
            y: params.y,
            z: params.z,
            radians: params.radians,
            cache: TransformCache::new(params.upstream),
        };
        if node.base.enabled() && params.instant_calculate.resolve() {
            node.calculate();
        }
        Ok(node)
    }
}

impl RotateNode {
    pub fn calculate(&mut self) -> Mat4 {
        let local = euler_matrix(
            self.x.resolve(),
            self.y.resolve(),
            self.z.resolve(),
            self.radians.resolve(),
        );
        self.cache.store(local);
        self.cache.cached()
    }

    pub fn cached_matrix(&self) -> Mat4 {
        self.cache.cached()
    }

    pub fn set_angles(
        &mut self,
        x: impl Into<Value<f64>>,
        y: impl Into<Value<f64>>,
        z: impl Into<Value<f64>>,
    ) {
        self.x = x.into();
        self.y = y.into();
        self.z = z.into();
    }

    pub fn set_upstream(&mut self, upstream: Upstream) {
        self.cache.set_upstream(upstream);
    }
}

impl Node for RotateNode {
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

impl TransformProvider for RotateNode {
    fn matrix(&self) -> Mat4 {
        self.cache.matrix(self.base.enabled())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/rotate.rs"]
mod tests;
