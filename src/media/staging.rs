use crate::common::error::UploadError;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A local file owned by one request.
///
/// The file is deleted when the value is dropped unless it was explicitly
/// removed or kept, so every exit path of a stage cleans up after itself.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    /// Writes `bytes` to `<root>/<name>` in a single write.
    pub async fn write(root: &Path, name: &str, bytes: Bytes) -> Result<Self, UploadError> {
        let path = root.join(name);
        let size = bytes.len();

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| UploadError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), size, "staged upload");
        Ok(Self::adopt(path))
    }

    /// Takes ownership of `path`, which another process may create later.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn remove(mut self) {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "removed staged file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove staged file"),
        }
    }

    /// Keeps the file on disk and hands back its path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "discarded staged file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to discard staged file"),
        }
    }
}
