use crate::foundation::core::{Rgba, Size, Value};
use crate::foundation::error::PageResult;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind};
use crate::render::drawable::SizedDrawable;

#[derive(Clone, Debug)]
pub struct RectParams {
    pub width: Value<f64>,
    pub height: Value<f64>,
    pub color: Value<Rgba>,
}

impl Default for RectParams {
    fn default() -> Self {
        Self {
            width: Value::Literal(100.0),
            height: Value::Literal(100.0),
            color: Value::Literal(Rgba::BLACK),
        }
    }
}

/// Solid-colour render target.
pub struct RectNode {
    base: NodeBase,
    width: Value<f64>,
    height: Value<f64>,
    color: Value<Rgba>,
}

impl NodeKind for RectNode {
    type Params = RectParams;
    const TYPE_NAME: &'static str = "rect";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        Ok(Self {
            base,
            width: params.width,
            height: params.height,
            color: params.color,
        })
    }
}

impl RectNode {
    pub fn color(&self) -> Rgba {
        self.color.resolve()
    }

    pub fn set_color(&mut self, color: impl Into<Value<Rgba>>) {
        self.color = color.into();
    }

    pub fn set_size(&mut self, width: impl Into<Value<f64>>, height: impl Into<Value<f64>>) {
        self.width = width.into();
        self.height = height.into();
    }
}

impl Node for RectNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if !self.base.should_update() {
            return Ok(());
        }
        self.base.run_setup();
        let size = Size::new(self.width(), self.height());
        ctx.surface.fill_target(self.base.id(), size, self.color());
        self.base.run_cleanup();
        Ok(())
    }
}

impl SizedDrawable for RectNode {
    fn width(&self) -> f64 {
        self.width.resolve()
    }

    fn height(&self) -> f64 {
        self.height.resolve()
    }
}
