//! Coordinate and geometry types shared by the engine and the game.
//!
//! Screen space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! The same `Vec2` also carries fractal-plane points; which space a value
//! lives in is a property of the field holding it, not of the type.

mod color;
mod mat3;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use mat3::Mat3;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
