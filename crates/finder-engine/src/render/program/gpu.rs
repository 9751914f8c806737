use wgpu::naga;
use naga::valid::Capabilities;

use crate::render::compute::KernelLayout;
use crate::render::quad::QuadLayout;

use super::check::{check_interface, compile_wgsl_with};
use super::{ProgramHandle, ShaderBackend, ShaderStage, COMPUTE_ENTRY, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// A stage that passed WGSL validation and was uploaded to the device.
pub struct CompiledStage {
    stage: ShaderStage,
    ir: naga::Module,
    module: wgpu::ShaderModule,
}

enum Program {
    Compute(wgpu::ComputePipeline),
    Graphics(wgpu::RenderPipeline),
}

/// wgpu-backed program store.
///
/// Every compute program shares the kernel bind layout (params uniform +
/// storage surface); every graphics program shares the quad layout.
pub struct GpuPrograms {
    device: wgpu::Device,
    capabilities: Capabilities,
    surface_format: wgpu::TextureFormat,
    kernel_layout: KernelLayout,
    quad_layout: QuadLayout,
    programs: Vec<Program>,
}

impl GpuPrograms {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            capabilities: shader_capabilities(device.features()),
            surface_format,
            kernel_layout: KernelLayout::new(device),
            quad_layout: QuadLayout::new(device),
            programs: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub(crate) fn kernel_layout(&self) -> &KernelLayout {
        &self.kernel_layout
    }

    pub(crate) fn quad_layout(&self) -> &QuadLayout {
        &self.quad_layout
    }

    pub(crate) fn compute_pipeline(&self, handle: ProgramHandle) -> Option<&wgpu::ComputePipeline> {
        match self.programs.get(handle.index())? {
            Program::Compute(p) => Some(p),
            Program::Graphics(_) => None,
        }
    }

    pub(crate) fn render_pipeline(&self, handle: ProgramHandle) -> Option<&wgpu::RenderPipeline> {
        match self.programs.get(handle.index())? {
            Program::Graphics(p) => Some(p),
            Program::Compute(_) => None,
        }
    }

    fn push(&mut self, program: Program) -> ProgramHandle {
        self.programs.push(program);
        ProgramHandle::from_index(self.programs.len() - 1)
    }

    /// Runs `create` inside a validation error scope.
    ///
    /// wgpu reports invalid descriptors through the uncaptured-error handler,
    /// which panics by default; the scope turns them into an `Err`.
    fn scoped<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        match pollster::block_on(scope.pop()) {
            Some(err) => Err(err.to_string()),
            None => Ok(value),
        }
    }
}

/// Shader capabilities backed by the features the device was created with.
fn shader_capabilities(features: wgpu::Features) -> Capabilities {
    let mut caps = Capabilities::empty();
    caps.set(Capabilities::FLOAT64, features.contains(wgpu::Features::SHADER_F64));
    caps.set(Capabilities::SHADER_INT64, features.contains(wgpu::Features::SHADER_INT64));
    caps
}

impl ShaderBackend for GpuPrograms {
    type Module = CompiledStage;

    fn compile(
        &mut self,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> Result<CompiledStage, String> {
        let ir = compile_wgsl_with(stage, source, self.capabilities)?;
        let module = self.scoped(|device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })?;
        Ok(CompiledStage { stage, ir, module })
    }

    fn link_compute(&mut self, label: &str, module: CompiledStage) -> Result<ProgramHandle, String> {
        if module.stage != ShaderStage::Compute {
            return Err(format!("expected a compute stage, got {}", module.stage));
        }

        let layout = &self.kernel_layout.pipeline_layout;
        let pipeline = self.scoped(|device| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                module: &module.module,
                entry_point: Some(COMPUTE_ENTRY),
                compilation_options: Default::default(),
                cache: None,
            })
        })?;

        Ok(self.push(Program::Compute(pipeline)))
    }

    fn link_graphics(
        &mut self,
        label: &str,
        vertex: CompiledStage,
        fragment: CompiledStage,
    ) -> Result<ProgramHandle, String> {
        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err(format!(
                "expected vertex + fragment stages, got {} + {}",
                vertex.stage, fragment.stage
            ));
        }
        check_interface(&vertex.ir, &fragment.ir)?;

        let layout = &self.quad_layout.pipeline_layout;
        let surface_format = self.surface_format;
        let pipeline = self.scoped(|device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &vertex.module,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment.module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })?;

        Ok(self.push(Program::Graphics(pipeline)))
    }
}
