/// How the device and swapchain are requested.
///
/// The game only needs a storage-capable default device, so feature and limit
/// requests are fixed; what varies is how the swapchain is presented.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when one is offered. When false a linear
    /// format wins, and shader output is shown unconverted.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unsupported or `None`.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub power_preference: wgpu::PowerPreference,
    /// Swapchain depth hint.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Default settings with a linear swapchain.
    pub fn linear() -> Self {
        Self {
            prefer_srgb: false,
            ..Self::default()
        }
    }
}
