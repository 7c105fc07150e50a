use crate::render::programs::ProgramCache;
use crate::render::surface::{ProgramId, Surface};

/// Per-frame context threaded through every update hook.
pub struct FrameCtx<'a> {
    pub surface: &'a mut dyn Surface,
    pub programs: &'a mut ProgramCache,
    /// Frame counter, starting at 0 for the first update of a page root.
    pub frame: u64,
    /// Seconds elapsed since the previous frame.
    pub dt_secs: f64,
}

impl<'a> FrameCtx<'a> {
    pub fn new(surface: &'a mut dyn Surface, programs: &'a mut ProgramCache) -> Self {
        Self {
            surface,
            programs,
            frame: 0,
            dt_secs: 0.0,
        }
    }

    pub fn with_timing(mut self, frame: u64, dt_secs: f64) -> Self {
        self.frame = frame;
        self.dt_secs = dt_secs;
        self
    }

    /// Program shared by every node of `kind`, created on first use.
    pub fn program(&mut self, kind: &'static str) -> ProgramId {
        self.programs.get_or_create(kind, &mut *self.surface)
    }
}
