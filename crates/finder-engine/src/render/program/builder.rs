use crate::content::{ResourceCache, ShaderText};

use super::{ProgramError, ProgramHandle, ShaderStage};

/// Platform shader compiler and linker.
///
/// `compile` and the `link_*` methods report failures as the backend's
/// diagnostic text; `ProgramBuilder` turns that into a `ProgramError`.
pub trait ShaderBackend {
    /// One compiled stage, ready to be linked.
    type Module;

    fn compile(
        &mut self,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> Result<Self::Module, String>;

    fn link_compute(&mut self, label: &str, module: Self::Module) -> Result<ProgramHandle, String>;

    fn link_graphics(
        &mut self,
        label: &str,
        vertex: Self::Module,
        fragment: Self::Module,
    ) -> Result<ProgramHandle, String>;
}

/// Builds programs from cached shader sources.
pub struct ProgramBuilder<'a, B: ShaderBackend> {
    sources: &'a ResourceCache<ShaderText>,
    backend: &'a mut B,
}

impl<'a, B: ShaderBackend> ProgramBuilder<'a, B> {
    pub fn new(sources: &'a ResourceCache<ShaderText>, backend: &'a mut B) -> Self {
        Self { sources, backend }
    }

    /// Compiles the source under `alias` as a compute program.
    pub fn build_compute(&mut self, alias: &str) -> Result<ProgramHandle, ProgramError> {
        let module = self.compile(ShaderStage::Compute, alias)?;
        let handle = self
            .backend
            .link_compute(alias, module)
            .map_err(|reason| link_failed(alias.to_owned(), reason))?;

        log::debug!("built compute program `{alias}`");
        Ok(handle)
    }

    /// Compiles and links a vertex + fragment pair.
    pub fn build_graphics(
        &mut self,
        vertex_alias: &str,
        fragment_alias: &str,
    ) -> Result<ProgramHandle, ProgramError> {
        let vertex = self.compile(ShaderStage::Vertex, vertex_alias)?;
        let fragment = self.compile(ShaderStage::Fragment, fragment_alias)?;

        let label = format!("{vertex_alias}+{fragment_alias}");
        let handle = self
            .backend
            .link_graphics(&label, vertex, fragment)
            .map_err(|reason| link_failed(label.clone(), reason))?;

        log::debug!("built graphics program `{label}`");
        Ok(handle)
    }

    fn compile(&mut self, stage: ShaderStage, alias: &str) -> Result<B::Module, ProgramError> {
        let source = self.sources.get(alias)?;
        self.backend.compile(stage, alias, source).map_err(|diagnostics| {
            log::error!("{stage} shader `{alias}` failed to compile:\n{diagnostics}");
            ProgramError::Compile {
                stage,
                alias: alias.to_owned(),
                diagnostics,
            }
        })
    }
}

fn link_failed(label: String, reason: String) -> ProgramError {
    log::error!("program `{label}` failed to link: {reason}");
    ProgramError::Link { label, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResourceError;

    /// Records calls; sources containing "bad" fail to compile and a vertex
    /// source containing "nolink" fails to link.
    #[derive(Default)]
    struct FakeBackend {
        compiled: Vec<(ShaderStage, String)>,
        linked: usize,
    }

    impl ShaderBackend for FakeBackend {
        type Module = String;

        fn compile(&mut self, stage: ShaderStage, label: &str, source: &str) -> Result<String, String> {
            self.compiled.push((stage, label.to_owned()));
            if source.contains("bad") {
                Err(format!("error: {label}:1:1 unexpected token"))
            } else {
                Ok(source.to_owned())
            }
        }

        fn link_compute(&mut self, _label: &str, _module: String) -> Result<ProgramHandle, String> {
            self.linked += 1;
            Ok(ProgramHandle::from_index(self.linked - 1))
        }

        fn link_graphics(
            &mut self,
            _label: &str,
            vertex: String,
            _fragment: String,
        ) -> Result<ProgramHandle, String> {
            if vertex.contains("nolink") {
                return Err("interface mismatch".to_owned());
            }
            self.linked += 1;
            Ok(ProgramHandle::from_index(self.linked - 1))
        }
    }

    fn cache_with(files: &[(&str, &str)]) -> (tempfile::TempDir, ResourceCache<ShaderText>) {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResourceCache::new(dir.path());
        for (name, text) in files {
            std::fs::write(dir.path().join(name), text).unwrap();
            cache.load(name, name).unwrap();
        }
        (dir, cache)
    }

    #[test]
    fn handles_are_distinct_per_program() {
        let (_dir, cache) = cache_with(&[("a", "ok a"), ("b", "ok b"), ("vs", "v"), ("fs", "f")]);
        let mut backend = FakeBackend::default();
        let mut builder = ProgramBuilder::new(&cache, &mut backend);

        let a = builder.build_compute("a").unwrap();
        let b = builder.build_compute("b").unwrap();
        let g = builder.build_graphics("vs", "fs").unwrap();

        assert_ne!(a, b);
        assert_ne!(b, g);
        assert_eq!(
            backend.compiled,
            vec![
                (ShaderStage::Compute, "a".to_owned()),
                (ShaderStage::Compute, "b".to_owned()),
                (ShaderStage::Vertex, "vs".to_owned()),
                (ShaderStage::Fragment, "fs".to_owned()),
            ]
        );
    }

    #[test]
    fn compile_failure_carries_diagnostics() {
        let (_dir, cache) = cache_with(&[("broken", "bad code")]);
        let mut backend = FakeBackend::default();
        let mut builder = ProgramBuilder::new(&cache, &mut backend);

        match builder.build_compute("broken") {
            Err(ProgramError::Compile { stage, alias, diagnostics }) => {
                assert_eq!(stage, ShaderStage::Compute);
                assert_eq!(alias, "broken");
                assert!(diagnostics.contains("unexpected token"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(backend.linked, 0);
    }

    #[test]
    fn fragment_failure_stops_before_link() {
        let (_dir, cache) = cache_with(&[("vs", "v"), ("fs", "bad f")]);
        let mut backend = FakeBackend::default();
        let mut builder = ProgramBuilder::new(&cache, &mut backend);

        let err = builder.build_graphics("vs", "fs").unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: ShaderStage::Fragment, .. }));
        assert_eq!(backend.linked, 0);
    }

    #[test]
    fn link_failure_is_reported() {
        let (_dir, cache) = cache_with(&[("vs", "nolink"), ("fs", "f")]);
        let mut backend = FakeBackend::default();
        let mut builder = ProgramBuilder::new(&cache, &mut backend);

        match builder.build_graphics("vs", "fs") {
            Err(ProgramError::Link { label, reason }) => {
                assert_eq!(label, "vs+fs");
                assert_eq!(reason, "interface mismatch");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_alias_aborts_build() {
        let (_dir, cache) = cache_with(&[]);
        let mut backend = FakeBackend::default();
        let mut builder = ProgramBuilder::new(&cache, &mut backend);

        let err = builder.build_compute("julia7").unwrap_err();
        assert!(matches!(err, ProgramError::Source(ResourceError::UnknownAlias { .. })));
        assert!(backend.compiled.is_empty());
    }
}
