//! GPU side of the game: programs, surfaces, and execution of
//! [`FrameCommands`].

use finder_engine::coords::Rect;
use finder_engine::core::{AppControl, FrameCtx};
use finder_engine::device::Gpu;
use finder_engine::render::{
    ComputeDispatcher, GpuPrograms, KernelDispatch, KernelParams, ProgramBuilder, ProgramHandle,
    QuadDraw, QuadRenderer, Surface2d,
};

use crate::assets::{END_SCREEN_ALIAS, FRAGMENT_ALIAS, GameAssets, VERTEX_ALIAS};
use crate::config::TARGETS_PER_LEVEL;
use crate::error::FinderError;
use crate::levels::Kernel;
use crate::orchestrator::{FrameCommands, ScreenLayout, SurfaceId};

/// Every surface a [`SurfaceId`] can name.
struct Surfaces {
    view: Option<Surface2d>,
    previews: [Option<Surface2d>; TARGETS_PER_LEVEL],
    end_screen: Surface2d,
}

impl Surfaces {
    fn get(&self, id: SurfaceId) -> Option<&Surface2d> {
        match id {
            SurfaceId::View => self.view.as_ref(),
            SurfaceId::Preview(i) => self.previews.get(i)?.as_ref(),
            SurfaceId::EndScreen => Some(&self.end_screen),
        }
    }
}

pub struct FinderGpu {
    programs: GpuPrograms,
    /// Indexed by [`Kernel::index`].
    kernels: Vec<ProgramHandle>,
    quad: ProgramHandle,
    dispatcher: ComputeDispatcher,
    quads: QuadRenderer,
    surfaces: Surfaces,
}

impl FinderGpu {
    /// Builds every program and uploads the end-screen image.
    pub fn new(gpu: &Gpu<'_>, assets: &GameAssets) -> Result<Self, FinderError> {
        let mut programs = GpuPrograms::new(gpu.device(), gpu.surface_format());

        let (kernels, quad) = {
            let mut builder = ProgramBuilder::new(&assets.shaders, &mut programs);
            let kernels = Kernel::ALL
                .iter()
                .map(|k| builder.build_compute(k.alias()))
                .collect::<Result<Vec<_>, _>>()?;
            let quad = builder.build_graphics(VERTEX_ALIAS, FRAGMENT_ALIAS)?;
            (kernels, quad)
        };
        log::info!("built {} GPU programs", programs.len());

        let end_pixels = assets.images.get(END_SCREEN_ALIAS)?;
        let end_screen = Surface2d::from_rgba8(gpu.device(), gpu.queue(), "end screen", end_pixels);

        Ok(Self {
            programs,
            kernels,
            quad,
            dispatcher: ComputeDispatcher::new(),
            quads: QuadRenderer::new(),
            surfaces: Surfaces {
                view: None,
                previews: Default::default(),
                end_screen,
            },
        })
    }

    /// Sizes the kernel surfaces for `layout` at `scale` physical pixels per
    /// logical pixel. Returns true when the preview surfaces were replaced and
    /// so hold nothing yet.
    pub fn prepare(&mut self, device: &wgpu::Device, layout: &ScreenLayout, scale: f32) -> bool {
        ensure_surface(&mut self.surfaces.view, device, "live view", texel_size(layout.view, scale));

        let mut previews_replaced = false;
        for (i, slot) in self.surfaces.previews.iter_mut().enumerate() {
            let size = texel_size(layout.previews[i], scale);
            previews_replaced |= ensure_surface(slot, device, &format!("preview {i}"), size);
        }
        previews_replaced
    }

    /// Runs the frame's dispatches to completion, then composites its draws.
    pub fn execute(&mut self, ctx: &mut FrameCtx<'_, '_>, commands: &FrameCommands) -> AppControl {
        let Self {
            programs,
            kernels,
            quad,
            dispatcher,
            quads,
            surfaces,
        } = self;
        let (programs, surfaces) = (&*programs, &*surfaces);

        let jobs: Vec<KernelDispatch<'_>> = commands
            .dispatches
            .iter()
            .filter_map(|d| {
                Some(KernelDispatch {
                    program: *kernels.get(d.kernel.index())?,
                    target: surfaces.get(d.target)?,
                    params: KernelParams {
                        offset: [d.offset.x, d.offset.y],
                        zoom: d.zoom,
                        iterations: d.iterations,
                    },
                })
            })
            .collect();

        if !jobs.is_empty() {
            ctx.submit_and_wait(|rctx, encoder| dispatcher.record(rctx, programs, encoder, &jobs));
        }

        let draws: Vec<QuadDraw<'_>> = commands
            .draws
            .iter()
            .filter_map(|d| {
                Some(QuadDraw {
                    surface: surfaces.get(d.source)?,
                    rect: d.rect,
                    tint: d.tint,
                })
            })
            .collect();

        ctx.render(commands.clear, |rctx, target| {
            quads.render(rctx, target, programs, *quad, &draws)
        })
    }
}

/// Physical texel size of `rect`, rounded to whole pixels.
fn texel_size(rect: Rect, scale: f32) -> (u32, u32) {
    let px = |v: f32| (v * scale).round().max(0.0) as u32;
    (px(rect.size.x), px(rect.size.y))
}

/// Replaces `slot` with a surface of `size` unless it already has that size.
/// A zero size keeps whatever is there.
fn ensure_surface(
    slot: &mut Option<Surface2d>,
    device: &wgpu::Device,
    label: &str,
    (width, height): (u32, u32),
) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    if slot.as_ref().is_some_and(|s| s.size() == (width, height)) {
        return false;
    }

    log::debug!("{label}: allocating {width}x{height} surface");
    *slot = Some(Surface2d::storage(device, label, width, height));
    true
}
