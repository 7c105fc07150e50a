use crate::event::geometry::TrianglePair;
use crate::event::router::EventRouter;
use crate::foundation::core::{NodeId, ObjectId, Rgba, Value};
use crate::foundation::error::PageResult;
use crate::foundation::math::{Mat4, Vec3};
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Handle, Node, NodeBase, NodeKind, SizedLink, TransformLink};
use crate::render::blend::BlendParams;
use crate::render::surface::QuadDraw;

/// Far plane of the default pixel-space projection.
pub const DEFAULT_FAR_PLANE: f64 = 5000.0;

const TEX_COORDS: [[f64; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

#[derive(Clone, Debug)]
pub struct DrawQuadParams {
    /// Sized render target to draw. Nothing is drawn without one.
    pub texture: Option<SizedLink>,
    pub transform: Option<TransformLink>,
    /// Defaults to a pixel-space orthographic projection of the surface.
    pub projection: Option<TransformLink>,
    /// Router the drawn quad is registered with.
    pub router: Option<Handle<EventRouter>>,
    /// Hit-target id; defaults to the node id.
    pub object_id: Option<Value<ObjectId>>,
    /// Overrides the texture's width.
    pub width: Option<Value<f64>>,
    /// Overrides the texture's height.
    pub height: Option<Value<f64>>,
    pub blending: Value<bool>,
    pub blend: BlendParams,
    pub clear: Value<bool>,
    pub clear_color: Option<Value<Rgba>>,
}

impl Default for DrawQuadParams {
    fn default() -> Self {
        Self {
            texture: None,
            transform: None,
            projection: None,
            router: None,
            object_id: None,
            width: None,
            height: None,
            blending: Value::Literal(true),
            blend: BlendParams::default(),
            clear: Value::Literal(false),
            clear_color: None,
        }
    }
}

impl DrawQuadParams {
    pub fn new(texture: SizedLink) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: TransformLink) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_projection(mut self, projection: TransformLink) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_router(
        mut self,
        router: Handle<EventRouter>,
        object_id: impl Into<Value<ObjectId>>,
    ) -> Self {
        self.router = Some(router);
        self.object_id = Some(object_id.into());
        self
    }
}

/// Draws a sized render target as a transformed quad and registers it as a hit target.
pub struct DrawQuadNode {
    base: NodeBase,
    params: DrawQuadParams,
    last_quad: Option<[Vec3; 4]>,
    culled: bool,
}

impl NodeKind for DrawQuadNode {
    type Params = DrawQuadParams;
    const TYPE_NAME: &'static str = "drawquad";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        Ok(Self {
            base,
            params,
            last_quad: None,
            culled: false,
        })
    }
}

impl DrawQuadNode {
    pub fn params(&self) -> &DrawQuadParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DrawQuadParams {
        &mut self.params
    }

    /// Normalized device coordinates of the last submitted quad.
    pub fn last_quad(&self) -> Option<[Vec3; 4]> {
        self.last_quad
    }

    /// The last update skipped drawing because the quad was outside the clip volume.
    pub fn culled(&self) -> bool {
        self.culled
    }

    pub fn object_id(&self) -> ObjectId {
        match &self.params.object_id {
            Some(id) => id.resolve(),
            None => ObjectId::from(self.base.id().0),
        }
    }

    fn draw(&mut self, ctx: &mut FrameCtx<'_>) {
        let Some(texture) = &self.params.texture else {
            tracing::trace!(node = %self.base.id(), "no texture, nothing to draw");
            return;
        };
        let (width, height) = {
            let t = texture.borrow();
            (
                self.params.width.as_ref().map_or_else(|| t.width(), Value::resolve),
                self.params.height.as_ref().map_or_else(|| t.height(), Value::resolve),
            )
        };
        let size = ctx.surface.size();
        let projection = match &self.params.projection {
            Some(p) => p.borrow().matrix(),
            None => Mat4::pixel_ortho(size.width, size.height, DEFAULT_FAR_PLANE),
        };
        let transform = self
            .params
            .transform
            .as_ref()
            .map_or(Mat4::IDENTITY, |t| t.borrow().matrix());
        let mvp = projection * transform;

        let corners = [
            [0.0, 0.0, 0.0, 1.0],
            [0.0, height, 0.0, 1.0],
            [width, height, 0.0, 1.0],
            [width, 0.0, 0.0, 1.0],
        ];
        let clip_vertices = corners.map(|c| mvp.mul_vec4(c));
        let ndc = clip_vertices.map(|c| Vec3::new(c[0] / c[3], c[1] / c[3], c[2] / c[3]));

        self.culled = outside_clip_volume(&ndc);
        if self.culled {
            tracing::trace!(node = %self.base.id(), "quad culled");
            return;
        }

        let quad = QuadDraw {
            program: ctx.program(Self::TYPE_NAME),
            source: texture.id(),
            clip_vertices,
            tex_coords: TEX_COORDS,
            blend: self
                .params
                .blending
                .resolve()
                .then(|| self.params.blend.resolve()),
            clear: self.params.clear.resolve(),
            clear_color: self.params.clear_color.as_ref().map(Value::resolve),
        };
        ctx.surface.draw_quad(&quad);
        self.last_quad = Some(ndc);

        if let Some(router) = &self.params.router {
            router
                .borrow_mut()
                .register(self.object_id(), TrianglePair::from_quad(ndc));
        }
    }
}

/// Whether a projected quad lies entirely outside the `[-1, 1]` clip volume.
///
/// Culled when every vertex is beyond the far or near plane, or when a separating axis exists
/// between the quad and the clip square in the xy plane.
pub fn outside_clip_volume(quad: &[Vec3; 4]) -> bool {
    if quad.iter().all(|p| p.z > 1.0) || quad.iter().all(|p| p.z < -1.0) {
        return true;
    }
    let square = [(-1.0, 1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];
    let poly = quad.map(|p| (p.x, p.y));
    separated(&square, &poly) || separated(&poly, &square)
}

fn separated(edges_of: &[(f64, f64); 4], other: &[(f64, f64); 4]) -> bool {
    for i in 0..4 {
        let a = edges_of[i];
        let b = edges_of[(i + 1) % 4];
        let axis = (-(b.1 - a.1), b.0 - a.0);
        if axis.0 == 0.0 && axis.1 == 0.0 {
            continue;
        }
        let project = |pts: &[(f64, f64); 4]| {
            pts.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                let d = p.0 * axis.0 + p.1 * axis.1;
                (lo.min(d), hi.max(d))
            })
        };
        let (a_lo, a_hi) = project(edges_of);
        let (b_lo, b_hi) = project(other);
        if a_hi < b_lo || b_hi < a_lo {
            return true;
        }
    }
    false
}

impl Node for DrawQuadNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn linked_nodes(&self) -> Vec<NodeId> {
        let p = &self.params;
        p.texture
            .as_ref()
            .map(|t| t.id())
            .into_iter()
            .chain(p.transform.as_ref().map(|t| t.id()))
            .chain(p.projection.as_ref().map(|t| t.id()))
            .chain(p.router.as_ref().map(|r| r.id()))
            .collect()
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if self.base.should_update() {
            self.base.run_setup();
            self.draw(ctx);
            self.base.run_cleanup();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/quad.rs"]
mod tests;
