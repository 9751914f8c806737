use std::path::Path;

use super::ResourceError;

/// A kind of content the cache can hold.
///
/// `load` turns a file into a value; `destroy` releases it when the cache
/// drops or an alias is overwritten. Most kinds only own heap memory and keep
/// the default `destroy`.
pub trait ResourceKind {
    type Output;

    /// Human-readable kind name used in diagnostics.
    const NAME: &'static str;

    fn load(path: &Path) -> Result<Self::Output, ResourceError>;

    fn destroy(value: Self::Output) {
        drop(value);
    }
}

/// Shader source text (WGSL).
#[derive(Debug, Copy, Clone)]
pub struct ShaderText;

impl ResourceKind for ShaderText {
    type Output = String;
    const NAME: &'static str = "shader";

    fn load(path: &Path) -> Result<String, ResourceError> {
        let bytes = read_bytes(path)?;
        String::from_utf8(bytes).map_err(|source| ResourceError::Utf8 {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Decoded image with straight (non-premultiplied) RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaPixels {
    pub width: u32,
    pub height: u32,
    /// Row-major, 4 bytes per pixel, top row first.
    pub pixels: Vec<u8>,
}

/// Image file decoded to RGBA8.
#[derive(Debug, Copy, Clone)]
pub struct RgbaImage;

impl ResourceKind for RgbaImage {
    type Output = RgbaPixels;
    const NAME: &'static str = "image";

    fn load(path: &Path) -> Result<RgbaPixels, ResourceError> {
        let bytes = read_bytes(path)?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| ResourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RgbaPixels {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ResourceError> {
    std::fs::read(path).map_err(|e| ResourceError::from_io(path.to_path_buf(), e))
}
