//! Named resource cache.
//!
//! Content is loaded from disk once at startup and looked up by alias. Each
//! kind of content (shader text, decoded images) is a `ResourceKind`; the cache
//! is generic over the kind and owns everything it loaded.

mod cache;
mod error;
mod kinds;

pub use cache::ResourceCache;
pub use error::ResourceError;
pub use kinds::{ResourceKind, RgbaImage, RgbaPixels, ShaderText};
