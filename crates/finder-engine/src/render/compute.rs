use bytemuck::{Pod, Zeroable};

use super::ctx::aligned_stride;
use super::program::{GpuPrograms, ProgramHandle};
use super::surface::{Surface2d, SurfaceUsage, STORAGE_FORMAT};
use super::RenderCtx;

/// Kernels run 8x8 invocations per workgroup.
pub const WORKGROUP_SIZE: u32 = 8;

/// Uniform block every kernel reads at `@group(0) @binding(0)`.
///
/// WGSL layout:
/// ```wgsl
/// struct FractalParams {
///     offset: vec2<f32>,
///     zoom: f32,
///     iterations: u32,
/// };
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct KernelParams {
    pub offset: [f32; 2],
    pub zoom: f32,
    pub iterations: u32,
}

const PARAMS_SIZE: u64 = std::mem::size_of::<KernelParams>() as u64;

/// Bind layout shared by all compute programs.
pub(crate) struct KernelLayout {
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) pipeline_layout: wgpu::PipelineLayout,
}

impl KernelLayout {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("finder kernel bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(PARAMS_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: STORAGE_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("finder kernel pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            bind_group_layout,
            pipeline_layout,
        }
    }
}

/// One kernel run writing a whole surface.
pub struct KernelDispatch<'s> {
    pub program: ProgramHandle,
    pub target: &'s Surface2d,
    pub params: KernelParams,
}

/// Records kernel dispatches into a single compute pass.
///
/// Each dispatch gets its own slot in a shared uniform buffer, addressed
/// through a dynamic offset.
#[derive(Default)]
pub struct ComputeDispatcher {
    params_buffer: Option<wgpu::Buffer>,
    capacity_bytes: u64,
}

impl ComputeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `jobs` in order. Call at most once per submitted encoder: the
    /// parameter upload is shared by every job recorded here.
    pub fn record(
        &mut self,
        ctx: &RenderCtx<'_>,
        programs: &GpuPrograms,
        encoder: &mut wgpu::CommandEncoder,
        jobs: &[KernelDispatch<'_>],
    ) {
        if jobs.is_empty() {
            return;
        }

        let align = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(PARAMS_SIZE, align);
        self.ensure_capacity(ctx.device, stride * jobs.len() as u64);

        let Some(buffer) = self.params_buffer.as_ref() else { return };

        let mut bytes = vec![0u8; (stride as usize) * jobs.len()];
        for (i, job) in jobs.iter().enumerate() {
            let at = i * stride as usize;
            bytes[at..at + PARAMS_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&job.params));
        }
        ctx.queue.write_buffer(buffer, 0, &bytes);

        let layout = &programs.kernel_layout().bind_group_layout;
        let bind_groups: Vec<wgpu::BindGroup> = jobs
            .iter()
            .map(|job| {
                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("finder kernel bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                                buffer,
                                offset: 0,
                                size: wgpu::BufferSize::new(PARAMS_SIZE),
                            }),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(job.target.view()),
                        },
                    ],
                })
            })
            .collect();

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("finder kernel pass"),
            timestamp_writes: None,
        });

        for (i, (job, bind_group)) in jobs.iter().zip(&bind_groups).enumerate() {
            let Some(pipeline) = programs.compute_pipeline(job.program) else {
                log::warn!("dispatch skipped: {:?} is not a compute program", job.program);
                continue;
            };
            if job.target.usage() != SurfaceUsage::Storage {
                log::warn!("dispatch skipped: target surface is not writable");
                continue;
            }

            let (w, h) = job.target.size();
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[(i as u64 * stride) as u32]);
            pass.dispatch_workgroups(w.div_ceil(WORKGROUP_SIZE), h.div_ceil(WORKGROUP_SIZE), 1);
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, required: u64) {
        if required <= self.capacity_bytes && self.params_buffer.is_some() {
            return;
        }

        let size = required.next_power_of_two().max(1024);
        self.params_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("finder kernel params"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity_bytes = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_wgsl_layout() {
        assert_eq!(PARAMS_SIZE, 16);

        let p = KernelParams {
            offset: [0.5, -1.0],
            zoom: 2.0,
            iterations: 60,
        };
        let bytes = bytemuck::bytes_of(&p);
        assert_eq!(&bytes[8..12], &2.0f32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &60u32.to_ne_bytes());
    }
}
