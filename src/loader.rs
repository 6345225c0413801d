use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Resolves a template name to its source text.
///
/// The render call invokes loaders from the blocking pool, so a plain
/// synchronous read is acceptable here even though the host is async.
/// Implementations must not assume which render call they serve: the
/// handle travels with each [`RoutingContext`](crate::RoutingContext)
/// and is bound per call.
pub trait TemplateLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<String, LoadError>;
}

impl<F> TemplateLoader for F
where
    F: Fn(&str) -> Result<String, LoadError> + Send + Sync,
{
    fn load(&self, name: &str) -> Result<String, LoadError> {
        self(name)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("template '{0}' not found")]
    NotFound(String),
    #[error("failed to read template '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template '{0}' is not valid UTF-8")]
    Utf8(String),
}

/// Loads template sources from a directory on the local file system.
///
/// Template names are taken as paths relative to the root directory.
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLoader for FsLoader {
    fn load(&self, name: &str) -> Result<String, LoadError> {
        let path = self.root.join(name);
        // Read raw bytes and decode explicitly so a non-UTF-8 source file
        // surfaces as a typed error instead of a generic i/o failure.
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoadError::NotFound(name.to_string()));
            }
            Err(e) => {
                return Err(LoadError::Io {
                    name: name.to_string(),
                    source: e,
                });
            }
        };
        String::from_utf8(raw).map_err(|_| LoadError::Utf8(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_file_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<p>hello</p>").unwrap();

        let loader = FsLoader::new(dir.path());
        assert_eq!(loader.load("index.html").unwrap(), "<p>hello</p>");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsLoader::new(dir.path());

        let err = loader.load("nope.html").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(name) if name == "nope.html"));
    }

    #[test]
    fn invalid_utf8_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.html"), [0xff, 0xfe, b'x']).unwrap();

        let loader = FsLoader::new(dir.path());
        let err = loader.load("bad.html").unwrap_err();
        assert!(matches!(err, LoadError::Utf8(name) if name == "bad.html"));
    }

    #[test]
    fn closures_are_loaders() {
        let loader = |name: &str| -> Result<String, LoadError> { Ok(format!("source of {name}")) };
        assert_eq!(loader.load("x").unwrap(), "source of x");
    }
}
