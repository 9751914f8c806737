//! Loads every file under the resource directory the game needs.

use std::path::Path;

use finder_engine::content::{ResourceCache, ResourceError, RgbaImage, ShaderText};

use crate::levels::Kernel;

pub const VERTEX_ALIAS: &str = "vertex";
pub const FRAGMENT_ALIAS: &str = "fragment";
pub const END_SCREEN_ALIAS: &str = "endscreen";

/// Shader sources and images, keyed by alias.
///
/// Kernel sources are stored under [`Kernel::alias`].
pub struct GameAssets {
    pub shaders: ResourceCache<ShaderText>,
    pub images: ResourceCache<RgbaImage>,
}

impl GameAssets {
    /// Fails on the first missing or undecodable file.
    pub fn load(res_dir: &Path) -> Result<Self, ResourceError> {
        let mut shaders = ResourceCache::new(res_dir);
        for kernel in Kernel::ALL {
            shaders.load(kernel.file_name(), kernel.alias())?;
        }
        shaders.load("vertex.wgsl", VERTEX_ALIAS)?;
        shaders.load("fragment.wgsl", FRAGMENT_ALIAS)?;

        let mut images = ResourceCache::new(res_dir);
        images.load("endscreen.png", END_SCREEN_ALIAS)?;

        log::info!(
            "loaded {} shaders and {} images from {}",
            shaders.len(),
            images.len(),
            res_dir.display()
        );
        Ok(Self { shaders, images })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_engine::render::ShaderStage;
    use finder_engine::render::program::{check_interface, compile_wgsl};

    use crate::config::DEFAULT_RES_DIR;

    fn assets() -> GameAssets {
        GameAssets::load(Path::new(DEFAULT_RES_DIR)).unwrap()
    }

    #[test]
    fn bundled_resources_load() {
        let assets = assets();
        assert_eq!(assets.shaders.len(), Kernel::ALL.len() + 2);
        let end = assets.images.get(END_SCREEN_ALIAS).unwrap();
        assert!(end.width > 0 && end.height > 0);
        assert_eq!(end.pixels.len(), (end.width * end.height * 4) as usize);
    }

    #[test]
    fn every_kernel_validates() {
        let assets = assets();
        for kernel in Kernel::ALL {
            let src = assets.shaders.get(kernel.alias()).unwrap();
            if let Err(diag) = compile_wgsl(ShaderStage::Compute, src) {
                panic!("{kernel} failed:\n{diag}");
            }
        }
    }

    #[test]
    fn quad_stages_validate_and_link() {
        let assets = assets();
        let vs = compile_wgsl(ShaderStage::Vertex, assets.shaders.get(VERTEX_ALIAS).unwrap()).unwrap();
        let fs =
            compile_wgsl(ShaderStage::Fragment, assets.shaders.get(FRAGMENT_ALIAS).unwrap()).unwrap();
        check_interface(&vs, &fs).unwrap();
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mandelbrot.wgsl"), "// empty").unwrap();

        match GameAssets::load(dir.path()) {
            Err(ResourceError::NotFound { path }) => assert!(path.ends_with("tricorn.wgsl")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("load should fail"),
        }
    }
}
