use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Rgba, Size};
use crate::foundation::error::{PageError, PageResult};
use crate::graph::emitter::{Emitter, Listener};
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Handle, IdAllocator, NodeKind, NodeOpts, NodeRef, instantiate};
use crate::render::programs::ProgramCache;
use crate::render::surface::{CullFaceMode, PipelineState, Surface};

/// Page-level configuration.
///
/// ```json
/// { "clearColor": [1, 1, 1, 1], "cullFaceEnable": true, "cullFace": "back", "resize": true }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub clear_color: Rgba,
    pub clear_depth: f64,
    pub clear_stencil: i32,
    pub cull_face_enable: bool,
    /// Unknown names fall back to `back`.
    pub cull_face: CullFaceMode,
    /// Emit `resize` events from [`PageRoot::resize`].
    pub resize: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            clear_color: Rgba::WHITE,
            clear_depth: 1.0,
            clear_stencil: 0,
            cull_face_enable: false,
            cull_face: CullFaceMode::Back,
            resize: false,
        }
    }
}

impl PageConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> PageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PageError::serde(format!("parse page config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PageError::validation(format!("open page config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn pipeline_state(&self) -> PipelineState {
        PipelineState {
            clear_color: self.clear_color,
            clear_depth: self.clear_depth,
            clear_stencil: self.clear_stencil,
            cull_face_enable: self.cull_face_enable,
            cull_face: self.cull_face,
        }
    }
}

/// Owner of node ids, per-kind programs and the root node; the host's entry point.
pub struct PageRoot {
    config: PageConfig,
    build: BuildCtx,
    programs: ProgramCache,
    root_node: Option<NodeRef>,
    events: Emitter,
    frame: u64,
}

impl Default for PageRoot {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl PageRoot {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            build: BuildCtx::new(IdAllocator::default()),
            programs: ProgramCache::new(),
            root_node: None,
            events: Emitter::new(),
            frame: 0,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Create a node that is not registered in any graph.
    pub fn node<K: NodeKind>(&self, params: K::Params) -> PageResult<Handle<K>> {
        self.node_with::<K>(NodeOpts::default(), params)
    }

    pub fn node_with<K: NodeKind>(&self, opts: NodeOpts, params: K::Params) -> PageResult<Handle<K>> {
        let handle = instantiate::<K>(&self.build, opts, params)?;
        tracing::trace!(node = %handle.id(), kind = K::TYPE_NAME, "node created");
        Ok(handle)
    }

    /// Node driven by [`PageRoot::update`], usually a graph.
    pub fn set_root_node(&mut self, node: NodeRef) {
        self.root_node = Some(node);
    }

    pub fn root_node(&self) -> Option<&NodeRef> {
        self.root_node.as_ref()
    }

    /// Sort the root node if it is a graph.
    pub fn sort(&self) -> PageResult<()> {
        let Some(root) = &self.root_node else {
            return Ok(());
        };
        let mut node = root.borrow_mut();
        match node.as_graph_mut() {
            Some(graph) => graph.sort(),
            None => Ok(()),
        }
    }

    /// Apply the configured pipeline state to a (new) surface. Programs are recreated lazily.
    pub fn attach(&mut self, surface: &mut dyn Surface) {
        self.programs.clear();
        surface.apply_state(&self.config.pipeline_state());
        tracing::debug!(size = ?surface.size(), "surface attached");
    }

    /// Run one frame: update the root node against `surface`.
    pub fn update(&mut self, surface: &mut dyn Surface, dt_secs: f64) -> PageResult<()> {
        let frame = self.frame;
        self.frame += 1;
        let Some(root) = &self.root_node else {
            return Ok(());
        };
        let mut ctx = FrameCtx::new(surface, &mut self.programs).with_timing(frame, dt_secs);
        root.borrow_mut().update(&mut ctx)
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn programs(&self) -> &ProgramCache {
        &self.programs
    }

    pub fn on(&mut self, event: &str, listener: Listener) -> bool {
        self.events.on(event, listener)
    }

    /// Report a new surface size. Emits `resize` when enabled in the config.
    pub fn resize(&self, size: Size) -> bool {
        if !self.config.resize {
            return false;
        }
        let payload = serde_json::json!({ "width": size.width, "height": size.height });
        self.events.trigger("resize", &payload);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/page.rs"]
mod tests;
