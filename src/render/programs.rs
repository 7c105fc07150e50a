use std::collections::BTreeMap;

use crate::render::surface::{ProgramId, Surface};

/// Per-kind draw programs, created lazily on first use.
///
/// Owned by the page root; every node of one kind shares a single program.
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: BTreeMap<&'static str, ProgramId>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the program for `kind`, asking `surface` to create it if absent.
    pub fn get_or_create(&mut self, kind: &'static str, surface: &mut dyn Surface) -> ProgramId {
        if let Some(&program) = self.programs.get(kind) {
            return program;
        }
        let program = surface.create_program(kind);
        tracing::debug!(kind, program = program.0, "program created");
        self.programs.insert(kind, program);
        program
    }

    pub fn get(&self, kind: &str) -> Option<ProgramId> {
        self.programs.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Forget every program, e.g. after the host surface was recreated.
    pub fn clear(&mut self) {
        self.programs.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/programs.rs"]
mod tests;
