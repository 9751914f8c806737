use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{ResourceError, ResourceKind};

/// Alias-keyed store of loaded content of one kind.
///
/// Paths passed to `load` are resolved against the cache root. Entries live
/// until the cache is dropped; loading an alias twice replaces the old value.
pub struct ResourceCache<K: ResourceKind> {
    root: PathBuf,
    entries: HashMap<String, K::Output>,
}

impl<K: ResourceKind> ResourceCache<K> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads `path` (relative to the root) and stores it under `alias`.
    pub fn load(&mut self, path: impl AsRef<Path>, alias: &str) -> Result<(), ResourceError> {
        let full = self.root.join(path.as_ref());
        let value = K::load(&full)?;
        log::debug!("loaded {} `{alias}` from {}", K::NAME, full.display());

        if let Some(old) = self.entries.insert(alias.to_owned(), value) {
            log::debug!("{} alias `{alias}` overwritten", K::NAME);
            K::destroy(old);
        }
        Ok(())
    }

    /// Returns the content stored under `alias`.
    pub fn get(&self, alias: &str) -> Result<&K::Output, ResourceError> {
        self.entries
            .get(alias)
            .ok_or_else(|| ResourceError::UnknownAlias {
                kind: K::NAME,
                alias: alias.to_owned(),
            })
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: ResourceKind> Drop for ResourceCache<K> {
    fn drop(&mut self) {
        for (_, value) in self.entries.drain() {
            K::destroy(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::content::{RgbaImage, ShaderText};

    #[test]
    fn loads_text_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vertex"), "@vertex fn vs_main() {}").unwrap();

        let mut cache = ResourceCache::<ShaderText>::new(dir.path());
        cache.load("vertex", "vertex").unwrap();

        assert_eq!(cache.get("vertex").unwrap(), "@vertex fn vs_main() {}");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResourceCache::<ShaderText>::new(dir.path());

        let err = cache.load("nope", "nope").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
        assert!(!cache.contains("nope"));
    }

    #[test]
    fn unknown_alias_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::<ShaderText>::new(dir.path());

        match cache.get("mandelbrot") {
            Err(ResourceError::UnknownAlias { kind, alias }) => {
                assert_eq!(kind, "shader");
                assert_eq!(alias, "mandelbrot");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn second_load_overwrites_alias() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "first").unwrap();
        std::fs::write(dir.path().join("b"), "second").unwrap();

        let mut cache = ResourceCache::<ShaderText>::new(dir.path());
        cache.load("a", "src").unwrap();
        cache.load("b", "src").unwrap();

        assert_eq!(cache.get("src").unwrap(), "second");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        img.save(dir.path().join("end.png")).unwrap();

        let mut cache = ResourceCache::<RgbaImage>::new(dir.path());
        cache.load("end.png", "end").unwrap();

        let px = cache.get("end").unwrap();
        assert_eq!((px.width, px.height), (3, 2));
        assert_eq!(px.pixels.len(), 3 * 2 * 4);
        assert_eq!(&px.pixels[20..24], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_image_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"definitely not a png").unwrap();

        let mut cache = ResourceCache::<RgbaImage>::new(dir.path());
        let err = cache.load("bad.png", "bad").unwrap_err();
        assert!(matches!(err, ResourceError::Decode { .. }));
    }

    static DESTROYED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl ResourceKind for Counted {
        type Output = usize;
        const NAME: &'static str = "counted";

        fn load(path: &Path) -> Result<usize, ResourceError> {
            Ok(path.as_os_str().len())
        }

        fn destroy(_value: usize) {
            DESTROYED.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn destroy_runs_on_overwrite_and_drop() {
        let mut cache = ResourceCache::<Counted>::new("root");
        cache.load("x", "one").unwrap();
        cache.load("y", "one").unwrap();
        cache.load("z", "two").unwrap();
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 1);

        drop(cache);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 3);
    }
}
