//! File-system capability carried in a [`Config`](crate::Config).
//!
//! Requests never touch the adapter; it travels with the configuration so
//! callers can persist decoded blobs next to the client that fetched them.

use crate::{response::Blob, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Persists and restores binary content by file name.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Writes `data` under `filename`, replacing any existing content.
    async fn save(&self, data: &Blob, filename: &str) -> Result<()>;

    /// Reads the content stored under `filename`.
    async fn load(&self, filename: &str) -> Result<Blob>;
}

/// [`FileSystem`] storing files below a root directory with `tokio::fs`.
///
/// File names are relative to the root; absolute names and names containing
/// `..` are rejected.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    /// Creates an adapter rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, filename: &str) -> io::Result<PathBuf> {
        let relative = Path::new(filename);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if filename.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("file name must stay inside the root: {}", filename),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn save(&self, data: &Blob, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data.bytes).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Saved blob");
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Blob> {
        let path = self.resolve(filename)?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(Blob::new(bytes, None))
    }
}
