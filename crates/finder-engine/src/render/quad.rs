use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Mat3, Rect, Viewport};

use super::ctx::aligned_stride;
use super::program::{GpuPrograms, ProgramHandle};
use super::surface::{Surface2d, SurfaceUsage};
use super::{RenderCtx, RenderTarget};

/// Per-draw uniform at `@group(0) @binding(0)`.
///
/// WGSL layout:
/// ```wgsl
/// struct Quad {
///     transform: mat3x3<f32>, // 3 columns, each padded to 16 bytes
///     tint: vec4<f32>,
/// };
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct QuadUniform {
    transform: [[f32; 4]; 3],
    tint: [f32; 4],
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<QuadUniform>() as u64;

/// Bind layout shared by all graphics programs.
///
/// Group 0 holds the per-draw uniform, group 1 the sampled surface.
pub(crate) struct QuadLayout {
    pub(crate) uniform_layout: wgpu::BindGroupLayout,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
    pub(crate) pipeline_layout: wgpu::PipelineLayout,
}

impl QuadLayout {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("finder quad uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("finder quad texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("finder quad pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        Self {
            uniform_layout,
            texture_layout,
            pipeline_layout,
        }
    }
}

/// One textured rectangle.
pub struct QuadDraw<'s> {
    pub surface: &'s Surface2d,
    /// Destination in logical pixels.
    pub rect: Rect,
    /// Multiplied with the sampled color.
    pub tint: ColorRgba,
}

/// Maps the unit square onto `rect` and then into clip space.
pub fn quad_transform(viewport: Viewport, rect: Rect) -> Mat3 {
    Mat3::ortho_top_left(viewport) * Mat3::from_rect(rect)
}

/// Draws textured quads with a graphics program over the current target.
///
/// The target is loaded, not cleared; draws land in slice order.
#[derive(Default)]
pub struct QuadRenderer {
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    capacity_bytes: u64,

    nearest: Option<wgpu::Sampler>,
    linear: Option<wgpu::Sampler>,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        programs: &GpuPrograms,
        program: ProgramHandle,
        draws: &[QuadDraw<'_>],
    ) {
        if draws.is_empty() {
            return;
        }
        let Some(pipeline) = programs.render_pipeline(program) else {
            log::warn!("quad draw skipped: {program:?} is not a graphics program");
            return;
        };

        let align = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(UNIFORM_SIZE, align);
        self.ensure_uniforms(ctx, programs, stride * draws.len() as u64);
        self.ensure_samplers(ctx);

        let (Some(buffer), Some(uniform_bg)) =
            (self.uniform_buffer.as_ref(), self.uniform_bind_group.as_ref())
        else {
            return;
        };
        let (Some(nearest), Some(linear)) = (self.nearest.as_ref(), self.linear.as_ref()) else {
            return;
        };

        let mut bytes = vec![0u8; (stride as usize) * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let u = QuadUniform {
                transform: quad_transform(ctx.viewport, draw.rect).to_gpu_columns(),
                tint: draw.tint.to_array(),
            };
            let at = i * stride as usize;
            bytes[at..at + UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&u));
        }
        ctx.queue.write_buffer(buffer, 0, &bytes);

        let texture_layout = &programs.quad_layout().texture_layout;
        let texture_groups: Vec<wgpu::BindGroup> = draws
            .iter()
            .map(|draw| {
                let sampler = match draw.surface.usage() {
                    SurfaceUsage::Storage => nearest,
                    SurfaceUsage::Image => linear,
                };
                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("finder quad texture bind group"),
                    layout: texture_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(draw.surface.view()),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                })
            })
            .collect();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("finder quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        for (i, texture_bg) in texture_groups.iter().enumerate() {
            rpass.set_bind_group(0, uniform_bg, &[(i as u64 * stride) as u32]);
            rpass.set_bind_group(1, texture_bg, &[]);
            rpass.draw(0..6, 0..1);
        }
    }

    fn ensure_uniforms(&mut self, ctx: &RenderCtx<'_>, programs: &GpuPrograms, required: u64) {
        if required <= self.capacity_bytes && self.uniform_bind_group.is_some() {
            return;
        }

        let size = required.next_power_of_two().max(2048);
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("finder quad uniforms"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("finder quad uniform bind group"),
            layout: &programs.quad_layout().uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });

        self.uniform_buffer = Some(buffer);
        self.uniform_bind_group = Some(bind_group);
        self.capacity_bytes = size;
    }

    fn ensure_samplers(&mut self, ctx: &RenderCtx<'_>) {
        if self.nearest.is_some() && self.linear.is_some() {
            return;
        }

        let make = |label, filter| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: filter,
                min_filter: filter,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            })
        };

        self.nearest = Some(make("finder nearest sampler", wgpu::FilterMode::Nearest));
        self.linear = Some(make("finder linear sampler", wgpu::FilterMode::Linear));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn uniform_is_64_bytes() {
        assert_eq!(UNIFORM_SIZE, 64);
    }

    #[test]
    fn full_window_quad_covers_clip_space() {
        let vp = Viewport::new(800.0, 600.0);
        let m = quad_transform(vp, Rect::new(0.0, 0.0, 800.0, 600.0));

        assert_close(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_close(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn side_panel_quad_lands_right_of_view() {
        let vp = Viewport::new(1000.0, 800.0);
        // Second preview: x from 800 to 1000, y from 200 to 400.
        let m = quad_transform(vp, Rect::new(800.0, 200.0, 200.0, 200.0));

        assert_close(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(0.6, 0.5));
        assert_close(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 0.0));
    }
}
