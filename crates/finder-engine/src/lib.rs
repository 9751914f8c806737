//! Fractal Finder engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the game:
//! window loop, input, content loading and the small set of
//! GPU programs (compute kernels and a textured quad) the game drives.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod content;
pub mod render;
