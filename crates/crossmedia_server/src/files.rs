//! Direct file serving for local/debug mode.

use crossmedia_error::{ServeError, ServeErrorKind};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

/// Resolve `storage_path` below `root`.
///
/// A leading slash is ignored; `..` and drive prefixes are rejected so the result
/// never leaves `root`.
pub fn resolve_media_path(root: &Path, storage_path: &str) -> Result<PathBuf, ServeError> {
    let mut resolved = root.to_path_buf();
    for component in Path::new(storage_path).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(ServeError::new(ServeErrorKind::PathTraversal(
                    storage_path.to_string(),
                )));
            }
        }
    }
    if resolved == root {
        return Err(ServeError::new(ServeErrorKind::NotFound(
            storage_path.to_string(),
        )));
    }
    Ok(resolved)
}

/// Read the file behind `storage_path` from `root`.
#[instrument(skip(root))]
pub async fn read_media(root: &Path, storage_path: &str) -> Result<Vec<u8>, ServeError> {
    let path = resolve_media_path(root, storage_path)?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "Read media file");
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ServeError::new(
            ServeErrorKind::NotFound(storage_path.to_string()),
        )),
        Err(e) => Err(ServeError::new(ServeErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))),
    }
}
