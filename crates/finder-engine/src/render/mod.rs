//! GPU rendering subsystem.
//!
//! Programs are built once from cached WGSL (`program`). Compute kernels write
//! into storage `Surface2d`s (`compute`); surfaces are then drawn as textured
//! quads over the swapchain (`quad`).
//!
//! Convention:
//! - quad rects are in logical pixels (top-left origin, +Y down)
//! - surface texel (0, 0) is the top-left corner

mod compute;
mod ctx;
mod quad;
mod surface;

pub mod program;

pub use compute::{ComputeDispatcher, KernelDispatch, KernelParams, WORKGROUP_SIZE};
pub use ctx::{RenderCtx, RenderTarget};
pub use program::{GpuPrograms, ProgramBuilder, ProgramError, ProgramHandle, ShaderBackend, ShaderStage};
pub use quad::{quad_transform, QuadDraw, QuadRenderer};
pub use surface::{Surface2d, SurfaceUsage, STORAGE_FORMAT};
