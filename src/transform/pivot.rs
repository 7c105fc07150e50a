use crate::foundation::core::{NodeId, Value};
use crate::foundation::error::PageResult;
use crate::foundation::math::Mat4;
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Node, NodeBase, NodeKind, SizedLink};
use crate::transform::provider::{TransformCache, TransformProvider, Upstream};

/// Horizontal pivot anchor.
#[derive(Clone, Debug)]
pub enum AnchorX {
    Offset(Value<f64>),
    Left,
    Center,
    Right,
}

/// Vertical pivot anchor.
#[derive(Clone, Debug)]
pub enum AnchorY {
    Offset(Value<f64>),
    Top,
    Center,
    Bottom,
}

impl Default for AnchorX {
    fn default() -> Self {
        Self::Offset(Value::Literal(0.0))
    }
}

impl Default for AnchorY {
    fn default() -> Self {
        Self::Offset(Value::Literal(0.0))
    }
}

fn parse_offset(name: &str) -> Value<f64> {
    match name.trim().parse::<f64>() {
        Ok(v) => Value::Literal(v),
        Err(_) => {
            tracing::debug!(name, "unknown pivot anchor, using 0");
            Value::Literal(0.0)
        }
    }
}

impl AnchorX {
    /// `left`, `center` or `right` (case-insensitive), or a number. Anything else is offset 0.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Offset(parse_offset(name)),
        }
    }

    /// Offset in pixels; symbolic anchors need the object's width and are 0 without one.
    pub fn resolve(&self, width: Option<f64>) -> f64 {
        match (self, width) {
            (Self::Offset(v), _) => v.resolve(),
            (_, None) | (Self::Left, _) => 0.0,
            (Self::Center, Some(w)) => w / 2.0,
            (Self::Right, Some(w)) => w,
        }
    }
}

impl AnchorY {
    /// `top`, `center` or `bottom` (case-insensitive), or a number. Anything else is offset 0.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => Self::Offset(parse_offset(name)),
        }
    }

    pub fn resolve(&self, height: Option<f64>) -> f64 {
        match (self, height) {
            (Self::Offset(v), _) => v.resolve(),
            (_, None) | (Self::Top, _) => 0.0,
            (Self::Center, Some(h)) => h / 2.0,
            (Self::Bottom, Some(h)) => h,
        }
    }
}

impl From<f64> for AnchorX {
    fn from(v: f64) -> Self {
        Self::Offset(Value::Literal(v))
    }
}

impl From<f64> for AnchorY {
    fn from(v: f64) -> Self {
        Self::Offset(Value::Literal(v))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawAnchor {
    Number(f64),
    Name(String),
}

impl<'de> serde::Deserialize<'de> for AnchorX {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match RawAnchor::deserialize(d)? {
            RawAnchor::Number(v) => v.into(),
            RawAnchor::Name(s) => Self::parse(&s),
        })
    }
}

impl<'de> serde::Deserialize<'de> for AnchorY {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match RawAnchor::deserialize(d)? {
            RawAnchor::Number(v) => v.into(),
            RawAnchor::Name(s) => Self::parse(&s),
        })
    }
}

/// `translate(-dx, -dy, 0)` for anchors resolved against an optional `(width, height)`.
///
/// x resolves before y; the two axes never influence each other.
pub fn pivot_matrix(x: &AnchorX, y: &AnchorY, size: Option<(f64, f64)>) -> Mat4 {
    let dx = x.resolve(size.map(|s| s.0));
    let dy = y.resolve(size.map(|s| s.1));
    Mat4::translate(-dx, -dy, 0.0)
}

#[derive(Clone, Debug)]
pub struct PivotPointParams {
    pub x: AnchorX,
    pub y: AnchorY,
    /// Sized object symbolic anchors are measured against.
    pub object: Option<SizedLink>,
    pub upstream: Upstream,
    pub instant_calculate: Value<bool>,
}

impl Default for PivotPointParams {
    fn default() -> Self {
        Self {
            x: AnchorX::default(),
            y: AnchorY::default(),
            object: None,
            upstream: Upstream::default(),
            instant_calculate: Value::Literal(true),
        }
    }
}

impl PivotPointParams {
    pub fn anchored(x: AnchorX, y: AnchorY, object: SizedLink) -> Self {
        Self {
            x,
            y,
            object: Some(object),
            ..Self::default()
        }
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = upstream;
        self
    }
}

/// Moves the origin to an anchor point of a sized object.
pub struct PivotPointNode {
    base: NodeBase,
    x: AnchorX,
    y: AnchorY,
    object: Option<SizedLink>,
    cache: TransformCache,
}

impl NodeKind for PivotPointNode {
    type Params = PivotPointParams;
    const TYPE_NAME: &'static str = "pivotpoint";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let instant = params.instant_calculate.resolve();
        let mut node = Self {
            base,
            x: params.x,
            y: params.y,
            object: params.object,
            cache: TransformCache::new(params.upstream),
        };
        if node.base.enabled() && instant {
            node.calculate();
        }
        Ok(node)
    }
}

impl PivotPointNode {
    pub fn calculate(&mut self) -> Mat4 {
        let size = self.object.as_ref().map(|o| {
            let o = o.borrow();
            (o.width(), o.height())
        });
        self.cache.store(pivot_matrix(&self.x, &self.y, size));
        self.cache.cached()
    }

    pub fn cached_matrix(&self) -> Mat4 {
        self.cache.cached()
    }

    pub fn set_anchor(&mut self, x: AnchorX, y: AnchorY) {
        self.x = x;
        self.y = y;
    }

    pub fn set_object(&mut self, object: Option<SizedLink>) {
        self.object = object;
    }

    pub fn set_upstream(&mut self, upstream: Upstream) {
        self.cache.set_upstream(upstream);
    }
}

impl Node for PivotPointNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn linked_nodes(&self) -> Vec<NodeId> {
        let mut out = self.cache.linked();
        out.extend(self.object.as_ref().map(|o| o.id()));
        out
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

impl TransformProvider for PivotPointNode {
    fn matrix(&self) -> Mat4 {
        self.cache.matrix(self.base.enabled())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/pivot.rs"]
mod tests;
