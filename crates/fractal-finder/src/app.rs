use std::path::PathBuf;

use anyhow::Context;
use finder_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use finder_engine::device::Gpu;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::exploration::ExplorationState;
use crate::gpu::FinderGpu;
use crate::input::TickInput;
use crate::levels::LevelTable;
use crate::orchestrator::{RenderOrchestrator, ScreenLayout};

/// Ties the exploration state machine to the engine's frame loop.
pub struct FinderApp {
    res_dir: PathBuf,
    table: LevelTable,
    state: ExplorationState,
    orchestrator: RenderOrchestrator,
    gpu: Option<FinderGpu>,
}

impl FinderApp {
    pub fn new(config: &GameConfig, table: LevelTable) -> Self {
        let state = ExplorationState::new(&table);
        Self {
            res_dir: config.res_dir.clone(),
            table,
            state,
            orchestrator: RenderOrchestrator::new(),
            gpu: None,
        }
    }
}

impl App for FinderApp {
    fn on_gpu_ready(&mut self, _window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let assets = GameAssets::load(&self.res_dir)
            .with_context(|| format!("loading resources from {}", self.res_dir.display()))?;
        let finder_gpu = FinderGpu::new(gpu, &assets).context("building GPU programs")?;
        self.gpu = Some(finder_gpu);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(gpu) = self.gpu.as_mut() else {
            return AppControl::Continue;
        };

        let layout = ScreenLayout::new(ctx.window.logical_size());
        let input = TickInput::capture(ctx.input, ctx.input_frame, layout.view);
        let outcome = self.state.tick(&input, &self.table);
        if outcome.close_requested {
            log::info!("escape pressed, closing");
            return AppControl::Exit;
        }
        if outcome.just_won {
            log::info!("showing end screen");
        }

        let scale = ctx.window.window.scale_factor() as f32;
        if gpu.prepare(ctx.gpu.device(), &layout, scale) {
            self.orchestrator.invalidate_previews();
        }

        let commands = self.orchestrator.plan(&self.state, &self.table, &layout);
        gpu.execute(ctx, &commands)
    }
}
