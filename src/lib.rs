//! pagegraph is a retained-mode scene graph for 2D page rendering.
//!
//! Nodes (render targets, transforms, event routers, animation helpers) are wired into graphs.
//! Each frame the host calls [`PageRoot::update`]:
//!
//! - a [`GraphNode`] replays its dependency-sorted node list
//! - transform nodes recompute their matrices
//! - [`DrawQuadNode`]s submit quads to a [`Surface`] and register them with an [`EventRouter`]
//!
//! Pointer input is routed with [`EventRouter::dispatch`], which hit-tests the quads registered
//! during the previous frames.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod event;
pub(crate) mod graph;
pub(crate) mod render;
pub(crate) mod transform;

pub use crate::foundation::core::{NodeId, ObjectId, Point, Rect, Rgba, Size, Value};
pub use crate::foundation::error::{PageError, PageResult};
pub use crate::foundation::math::{Mat4, Vec3};

pub use crate::animation::ease::Ease;
pub use crate::animation::ease_node::{EaseNode, EaseParams, EaseState};
pub use crate::event::geometry::{FaceCulling, RayHit, RouterConfig, Triangle, TrianglePair};
pub use crate::event::input::{EventInfo, EventKind, Phase, PointerEvent};
pub use crate::event::router::{
    DispatchOutcome, EventHandler, EventRouter, Hit, HitList, RouterParams,
};
pub use crate::graph::emitter::{Emitter, Listener};
pub use crate::graph::frame::FrameCtx;
pub use crate::graph::func::{FuncNode, FuncParams};
pub use crate::graph::node::{
    BuildCtx, Handle, Hook, IdAllocator, Node, NodeBase, NodeKind, NodeOpts, NodeRef, SizedLink,
    TransformLink, parents_of,
};
pub use crate::graph::page::{PageConfig, PageRoot};
pub use crate::graph::scheduler::{GraphNode, GraphParams};
pub use crate::render::blend::{BlendEquation, BlendFactor, BlendParams, BlendState};
pub use crate::render::drawable::SizedDrawable;
pub use crate::render::image::{DecodedImage, ImageNode, ImageParams, ImageSource, load_image};
pub use crate::render::programs::ProgramCache;
pub use crate::render::quad::{DEFAULT_FAR_PLANE, DrawQuadNode, DrawQuadParams, outside_clip_volume};
pub use crate::render::rect::{RectNode, RectParams};
pub use crate::render::surface::{
    ClearMask, CullFaceMode, PipelineState, ProgramId, QuadDraw, RecordingSurface, Surface,
    SurfaceCommand,
};
pub use crate::transform::forest::{ForestOp, ForestParams, ForestRecord, TransformForest};
pub use crate::transform::forest_def::{ForestBindings, ForestDef, RecordDef, Scalar};
pub use crate::transform::matrix::{MatrixNode, MatrixParams};
pub use crate::transform::pivot::{AnchorX, AnchorY, PivotPointNode, PivotPointParams};
pub use crate::transform::provider::{TransformProvider, Upstream};
pub use crate::transform::rotate::{RotateNode, RotateParams};
pub use crate::transform::scale::{ScaleNode, ScaleParams};
pub use crate::transform::translate::{TranslateNode, TranslateParams};
