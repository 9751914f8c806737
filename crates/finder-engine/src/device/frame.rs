/// Swapchain image acquired for one frame, with the encoder recording into it.
///
/// The next image cannot be acquired while this one is held; hand it back
/// through `Gpu::submit`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
