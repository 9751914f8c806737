//! wgpu device and swapchain.
//!
//! `Gpu` owns the device, queue and window surface. Frames are acquired with
//! `begin_frame`, handed back with `submit`; offscreen work can be fenced
//! with `wait_idle`.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
