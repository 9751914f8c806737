//! Turns exploration state into per-frame GPU work.
//!
//! [`plan_frame`] is pure: it reads the state and the layout and returns a
//! [`FrameCommands`] list. [`RenderOrchestrator`] wraps it with the little
//! bookkeeping that spans frames (preview validity and the end-screen fade).

use finder_engine::coords::{ColorRgba, Mat3, Rect, Vec2, Viewport};
use finder_engine::render::quad_transform;

use crate::config::{END_FADE_STEP, PREVIEW_DEPTH, TARGETS_PER_LEVEL, VIEW_WIDTH_FRACTION};
use crate::exploration::ExplorationState;
use crate::levels::{Kernel, LevelTable};

/// Where every surface lands in the window, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenLayout {
    pub window: Viewport,
    /// Live view on the left.
    pub view: Rect,
    /// Preview column on the right; preview 0 sits at the bottom.
    pub previews: [Rect; TARGETS_PER_LEVEL],
}

impl ScreenLayout {
    pub fn new(window: Viewport) -> Self {
        let (w, h) = (window.width.max(0.0), window.height.max(0.0));
        let view_w = (w * VIEW_WIDTH_FRACTION).floor();
        let preview_w = w - view_w;
        let preview_h = h / TARGETS_PER_LEVEL as f32;

        let previews = std::array::from_fn(|i| {
            Rect::new(view_w, h - (i as f32 + 1.0) * preview_h, preview_w, preview_h)
        });

        Self {
            window,
            view: Rect::new(0.0, 0.0, view_w, h),
            previews,
        }
    }

    pub fn full(&self) -> Rect {
        Rect::new(0.0, 0.0, self.window.width, self.window.height)
    }

    /// Logical rectangle covered by `surface`.
    pub fn rect(&self, surface: SurfaceId) -> Rect {
        match surface {
            SurfaceId::View => self.view,
            SurfaceId::Preview(i) => self.previews[i],
            SurfaceId::EndScreen => self.full(),
        }
    }
}

/// Names a GPU surface without borrowing it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    View,
    Preview(usize),
    EndScreen,
}

/// One kernel run filling a surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dispatch {
    pub kernel: Kernel,
    pub target: SurfaceId,
    pub offset: Vec2,
    pub zoom: f32,
    pub iterations: u32,
}

/// One textured rectangle composited onto the window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Draw {
    pub source: SurfaceId,
    pub rect: Rect,
    pub tint: ColorRgba,
}

impl Draw {
    /// Unit square to clip space for a window of `window` size.
    pub fn transform(&self, window: Viewport) -> Mat3 {
        quad_transform(window, self.rect)
    }
}

/// Everything the GPU does this frame. Dispatches complete before any draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCommands {
    pub clear: ColorRgba,
    pub dispatches: Vec<Dispatch>,
    pub draws: Vec<Draw>,
}

/// Plans one frame.
///
/// While won only the end screen is drawn, tinted with `end_tint`. Otherwise
/// the live view is dispatched every frame and the previews only when
/// `refresh_previews` is set.
pub fn plan_frame(
    state: &ExplorationState,
    table: &LevelTable,
    layout: &ScreenLayout,
    refresh_previews: bool,
    end_tint: ColorRgba,
) -> FrameCommands {
    let clear = ColorRgba::black();

    if state.is_won() {
        return FrameCommands {
            clear,
            dispatches: Vec::new(),
            draws: vec![Draw {
                source: SurfaceId::EndScreen,
                rect: layout.full(),
                tint: end_tint,
            }],
        };
    }

    let level = state.level(table);
    let mut dispatches = Vec::with_capacity(TARGETS_PER_LEVEL + 1);

    if refresh_previews {
        dispatches.extend(level.targets.iter().enumerate().map(|(i, t)| Dispatch {
            kernel: level.kernel,
            target: SurfaceId::Preview(i),
            offset: t.center,
            zoom: t.half_width,
            iterations: PREVIEW_DEPTH,
        }));
    }

    let camera = state.camera();
    dispatches.push(Dispatch {
        kernel: level.kernel,
        target: SurfaceId::View,
        offset: camera.pan,
        zoom: camera.zoom,
        iterations: state.iteration_depth(),
    });

    let mut draws = Vec::with_capacity(TARGETS_PER_LEVEL + 1);
    draws.push(Draw {
        source: SurfaceId::View,
        rect: layout.view,
        tint: ColorRgba::white(),
    });
    draws.extend(state.markers().iter().enumerate().map(|(i, tint)| Draw {
        source: SurfaceId::Preview(i),
        rect: layout.previews[i],
        tint: *tint,
    }));

    FrameCommands { clear, dispatches, draws }
}

/// Frame planner with cross-frame memory.
#[derive(Debug)]
pub struct RenderOrchestrator {
    /// Level generation the preview surfaces currently show.
    previews_for: Option<u64>,
    end_tint: ColorRgba,
}

impl Default for RenderOrchestrator {
    fn default() -> Self {
        Self {
            previews_for: None,
            end_tint: ColorRgba::black(),
        }
    }
}

impl RenderOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a preview refresh, e.g. after the surfaces were recreated.
    pub fn invalidate_previews(&mut self) {
        self.previews_for = None;
    }

    pub fn end_tint(&self) -> ColorRgba {
        self.end_tint
    }

    pub fn plan(
        &mut self,
        state: &ExplorationState,
        table: &LevelTable,
        layout: &ScreenLayout,
    ) -> FrameCommands {
        if state.is_won() {
            self.end_tint = self.end_tint.brightened(END_FADE_STEP);
            return plan_frame(state, table, layout, false, self.end_tint);
        }

        let refresh = self.previews_for != Some(state.generation());
        if refresh {
            log::debug!("refreshing previews for level {}", state.level_index() + 1);
            self.previews_for = Some(state.generation());
        }
        plan_frame(state, table, layout, refresh, self.end_tint)
    }
}
