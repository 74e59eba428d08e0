use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file into memory.
///
/// A missing path is reported as [`LoadError::NotFound`]; nothing downstream
/// can proceed without the bytes, so the error is never swallowed here.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), len = bytes.len(), "loaded file");
            Ok(bytes)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::error!(path = %path.display(), "file not found");
            Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
