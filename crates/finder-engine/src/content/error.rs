use std::path::PathBuf;

/// Failure while loading or looking up cached content.
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    /// The file does not exist under the cache root.
    #[error("resource not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read resource {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shader source was not valid UTF-8.
    #[error("resource {} is not valid UTF-8", path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Image bytes could not be decoded.
    #[error("failed to decode image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Lookup of an alias that was never loaded.
    #[error("no {kind} resource loaded under alias `{alias}`")]
    UnknownAlias { kind: &'static str, alias: String },
}

impl ResourceError {
    /// Maps an I/O failure on `path`, keeping "not found" distinct.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
