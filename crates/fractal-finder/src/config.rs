//! Gameplay constants and startup configuration.

use std::path::PathBuf;

use finder_engine::device::GpuInit;
use finder_engine::logging::LoggingConfig;
use finder_engine::window::{RuntimeConfig, WindowMode};
use winit::dpi::LogicalSize;

/// Zoom (half-extent of the visible plane) after reset and on every level load.
pub const DEFAULT_ZOOM: f32 = 2.0;

/// Per-frame decay of a found target's marker color.
pub const FADE_STEP: f32 = 0.05;

/// Upper bound of the animation counter, which doubles as the live iteration depth.
pub const COUNTER_CEILING: u32 = 60;

/// Escape-iteration depth used for the preview surfaces.
pub const PREVIEW_DEPTH: u32 = 60;

/// Zoom factor per scroll line; scrolling away from the user zooms in.
pub const ZOOM_BASE: f32 = 0.9;

/// Per-frame brightening of the end-screen tint.
pub const END_FADE_STEP: f32 = 0.01;

/// Number of levels in a full game.
pub const LEVEL_COUNT: usize = 12;

/// Hidden targets per level.
pub const TARGETS_PER_LEVEL: usize = 4;

/// Share of the window width taken by the live view.
pub const VIEW_WIDTH_FRACTION: f32 = 0.8;

/// Environment variable that overrides the resource directory.
pub const RES_DIR_ENV: &str = "FRACTAL_FINDER_RES";

/// Directory used when `RES_DIR_ENV` is unset: the crate's own `res/`.
pub const DEFAULT_RES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res");

/// Startup configuration for the game binary.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Directory holding the WGSL sources and the end-screen image.
    pub res_dir: PathBuf,
    pub title: String,
    pub window_size: LogicalSize<f64>,
    pub window_mode: WindowMode,
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            res_dir: PathBuf::from(DEFAULT_RES_DIR),
            title: "Fractal Finder".to_string(),
            window_size: LogicalSize::new(1280.0, 720.0),
            window_mode: WindowMode::Windowed,
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Defaults with the resource directory taken from the environment when set.
    pub fn from_env() -> Self {
        Self::default().with_res_override(std::env::var_os(RES_DIR_ENV).map(PathBuf::from))
    }

    fn with_res_override(mut self, res_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = res_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.res_dir = dir;
        }
        self
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: self.window_size,
            mode: self.window_mode,
        }
    }

    /// Linear surface output, so kernel colors reach the screen unconverted.
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn res_dir_defaults_to_crate_res() {
        let cfg = GameConfig::default().with_res_override(None);
        assert!(cfg.res_dir.ends_with("res"));
        assert!(cfg.res_dir.join("vertex.wgsl").is_file());
    }

    #[test]
    fn env_override_replaces_res_dir() {
        let cfg = GameConfig::default().with_res_override(Some(PathBuf::from("/opt/ff/res")));
        assert_eq!(cfg.res_dir, PathBuf::from("/opt/ff/res"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let cfg = GameConfig::default().with_res_override(Some(PathBuf::new()));
        assert_eq!(cfg.res_dir, PathBuf::from(DEFAULT_RES_DIR));
    }

    #[test]
    fn runtime_config_carries_window_settings() {
        let cfg = GameConfig {
            window_mode: WindowMode::BorderlessFullscreen,
            ..GameConfig::default()
        };
        let rt = cfg.runtime_config();
        assert_eq!(rt.title, "Fractal Finder");
        assert_eq!(rt.mode, WindowMode::BorderlessFullscreen);
    }
}
