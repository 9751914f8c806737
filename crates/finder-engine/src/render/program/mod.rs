//! GPU program building.
//!
//! Shader text comes from a `ResourceCache<ShaderText>`. `ProgramBuilder` runs
//! it through a `ShaderBackend` (compile each stage, then link) and hands out
//! opaque `ProgramHandle`s. `GpuPrograms` is the wgpu backend; the WGSL checks
//! it relies on live in `check` and need no device.

mod builder;
mod check;
mod error;
mod gpu;

pub use builder::{ProgramBuilder, ShaderBackend};
pub use check::{
    check_bindings, check_interface, compile_wgsl, compile_wgsl_with, COMPUTE_ENTRY, FRAGMENT_ENTRY,
    VERTEX_ENTRY,
};
pub use error::ProgramError;
pub use gpu::{CompiledStage, GpuPrograms};

use std::fmt;

/// Opaque identifier of a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(u32);

impl ProgramHandle {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Compute,
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every source of this stage must export.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Compute => COMPUTE_ENTRY,
            ShaderStage::Vertex => VERTEX_ENTRY,
            ShaderStage::Fragment => FRAGMENT_ENTRY,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Compute => "compute",
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}
