use crate::content::RgbaPixels;

/// How a surface is produced, which also decides how it is sampled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceUsage {
    /// Written by compute kernels; sampled with nearest filtering.
    Storage,
    /// Uploaded once from decoded pixels; sampled with linear filtering.
    Image,
}

/// A 2D RGBA texture that can be drawn as a quad.
pub struct Surface2d {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    usage: SurfaceUsage,
}

/// Format kernels write into. Must match the storage binding in the kernel layout.
pub const STORAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

impl Surface2d {
    /// Creates a compute-writable surface. Zero dimensions are clamped to 1.
    pub fn storage(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STORAGE_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        Self::wrap(texture, width, height, SurfaceUsage::Storage)
    }

    /// Uploads decoded RGBA8 pixels. Like storage surfaces, texel values are
    /// sampled as stored, with no sRGB decode.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &RgbaPixels,
    ) -> Self {
        let (width, height) = (image.width.max(1), image.height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let expected = (width as usize) * (height as usize) * 4;
        if image.pixels.len() == expected {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &image.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                extent(width, height),
            );
        } else {
            log::warn!(
                "{label}: expected {expected} bytes of pixels, got {}; left blank",
                image.pixels.len()
            );
        }

        Self::wrap(texture, width, height, SurfaceUsage::Image)
    }

    fn wrap(texture: wgpu::Texture, width: u32, height: u32, usage: SurfaceUsage) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            usage,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn usage(&self) -> SurfaceUsage {
        self.usage
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}
