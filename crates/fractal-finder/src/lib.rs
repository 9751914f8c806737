//! Fractal Finder game crate.
//!
//! Gameplay (`levels`, `viewport`, `exploration`) is plain data and logic with
//! no GPU access. `orchestrator` turns that state into per-frame commands and
//! `gpu` carries them out on top of `finder-engine`.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod exploration;
pub mod gpu;
pub mod input;
pub mod levels;
pub mod orchestrator;
pub mod viewport;
