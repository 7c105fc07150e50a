use crate::foundation::core::{NodeId, Rgba, Size};
use crate::render::blend::BlendState;
use crate::render::image::DecodedImage;

/// Which buffers a clear touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearMask {
    pub const ALL: Self = Self {
        color: true,
        depth: true,
        stencil: true,
    };
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
        stencil: false,
    };
}

/// Opaque handle to a host-side draw program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(pub u32);

/// Faces the host rasterizer discards when culling is enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CullFaceMode {
    Front,
    #[default]
    Back,
    FrontAndBack,
}

impl CullFaceMode {
    /// Case-insensitive parse; unknown names fall back to [`CullFaceMode::Back`].
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "front" => Self::Front,
            "back" => Self::Back,
            "frontandback" | "front_and_back" => Self::FrontAndBack,
            other => {
                tracing::debug!(name = other, "unknown cull face, using back");
                Self::Back
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for CullFaceMode {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Ok(Self::parse(&name))
    }
}

/// Global pipeline state a page root applies when it attaches to a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineState {
    pub clear_color: Rgba,
    pub clear_depth: f64,
    pub clear_stencil: i32,
    pub cull_face_enable: bool,
    pub cull_face: CullFaceMode,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            clear_color: Rgba::TRANSPARENT,
            clear_depth: 1.0,
            clear_stencil: 0,
            cull_face_enable: false,
            cull_face: CullFaceMode::Back,
        }
    }
}

/// One textured quad, already in clip space.
///
/// Vertex order is `(0,0) (0,h) (w,h) (w,0)` of the source rectangle, drawn as a fan.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadDraw {
    pub program: ProgramId,
    /// Node whose render target supplies the pixels.
    pub source: NodeId,
    /// Homogeneous clip coordinates, before the perspective divide.
    pub clip_vertices: [[f64; 4]; 4],
    pub tex_coords: [[f64; 2]; 4],
    /// `None` disables blending for this draw.
    pub blend: Option<BlendState>,
    /// Clear colour+depth+stencil before drawing.
    pub clear: bool,
    /// One-off clear colour used by `clear`; `None` keeps the surface's current one.
    pub clear_color: Option<Rgba>,
}

/// Renderer contract the scene graph draws through.
pub trait Surface {
    /// Drawable size in pixels.
    fn size(&self) -> Size;

    fn clear(&mut self, mask: ClearMask);

    /// Create the program used by every node of `kind`. Called at most once per kind and cache.
    fn create_program(&mut self, kind: &'static str) -> ProgramId;

    fn draw_quad(&mut self, quad: &QuadDraw);

    /// Fill the render target owned by `target` with a solid colour.
    fn fill_target(&mut self, target: NodeId, size: Size, color: Rgba);

    /// Replace the render target owned by `target` with decoded pixels.
    fn upload_pixels(&mut self, target: NodeId, image: &DecodedImage);

    fn apply_state(&mut self, state: &PipelineState);
}

/// Command captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    Clear(ClearMask),
    CreateProgram {
        kind: &'static str,
        program: ProgramId,
    },
    DrawQuad(QuadDraw),
    FillTarget {
        target: NodeId,
        size: Size,
        color: Rgba,
    },
    UploadPixels {
        target: NodeId,
        width: u32,
        height: u32,
    },
    ApplyState(PipelineState),
}

/// Headless surface that records every command in order.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<SurfaceCommand>,
    next_program: u32,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            commands: Vec::new(),
            next_program: 1,
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Drain the recorded commands, e.g. between frames.
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draws(&self) -> impl Iterator<Item = &QuadDraw> {
        self.commands.iter().filter_map(|c| match c {
            SurfaceCommand::DrawQuad(q) => Some(q),
            _ => None,
        })
    }

    pub fn programs_created(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::CreateProgram { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, mask: ClearMask) {
        self.commands.push(SurfaceCommand::Clear(mask));
    }

    fn create_program(&mut self, kind: &'static str) -> ProgramId {
        let program = ProgramId(self.next_program);
        self.next_program += 1;
        self.commands
            .push(SurfaceCommand::CreateProgram { kind, program });
        program
    }

    fn draw_quad(&mut self, quad: &QuadDraw) {
        self.commands.push(SurfaceCommand::DrawQuad(quad.clone()));
    }

    fn fill_target(&mut self, target: NodeId, size: Size, color: Rgba) {
        self.commands.push(SurfaceCommand::FillTarget {
            target,
            size,
            color,
        });
    }

    fn upload_pixels(&mut self, target: NodeId, image: &DecodedImage) {
        self.commands.push(SurfaceCommand::UploadPixels {
            target,
            width: image.width,
            height: image.height,
        });
    }

    fn apply_state(&mut self, state: &PipelineState) {
        self.commands.push(SurfaceCommand::ApplyState(state.clone()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
