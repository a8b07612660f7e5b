//! Scratch files holding a downloaded image while it is recognized

use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("failed to create staging file in {root}: {source}")]
    Create {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write staging file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove staging file: {0}")]
    Release(#[source] io::Error),
}

/// Directory in which staging files are created.
///
/// Holds no per-task state: uniqueness of names comes from `tempfile`,
/// which retries on collision.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet
    pub async fn initialize(&self) -> Result<(), StagingError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StagingError::Create { root: self.root.clone(), source })
    }

    /// Create a new uniquely named file whose name ends in `.temp{suffix_hint}`
    pub async fn acquire(&self, suffix_hint: &str) -> Result<StagingFile, StagingError> {
        let root = self.root.clone();
        let suffix = format!(".temp{}", suffix_hint);

        let created = task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("ocr-")
                .suffix(&suffix)
                .tempfile_in(&root)
        })
        .await
        .map_err(io::Error::other)
        .and_then(|result| result);

        let file = created.map_err(|source| StagingError::Create { root: self.root.clone(), source })?;
        debug!("Acquired staging file {}", file.path().display());
        Ok(StagingFile { file: Some(file) })
    }
}

/// A staging file owned by one task. The backing file is removed by
/// [`StagingFile::release`] or, failing that, when the handle is dropped.
/// Creation and removal run on the blocking pool; the unlink in `Drop` is
/// the exception and happens inline on whatever thread drops the handle.
#[derive(Debug)]
pub struct StagingFile {
    file: Option<NamedTempFile>,
}

impl StagingFile {
    pub fn path(&self) -> &Path {
        match &self.file {
            Some(file) => file.path(),
            None => Path::new(""),
        }
    }

    pub async fn write_all(&self, data: &[u8]) -> Result<(), StagingError> {
        let path = self.path().to_path_buf();
        fs::write(&path, data)
            .await
            .map_err(|source| StagingError::Write { path, source })
    }

    /// Remove the backing file now and surface any removal error
    pub async fn release(mut self) -> Result<(), StagingError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };

        let path = file.path().to_path_buf();
        task::spawn_blocking(move || file.close())
            .await
            .map_err(io::Error::other)
            .and_then(|result| result)
            .map_err(StagingError::Release)?;
        debug!("Released staging file {}", path.display());
        Ok(())
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                warn!("Failed to remove staging file {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[tokio::test]
    async fn acquired_file_exists_until_released() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::new(root.path());

        let file = staging.acquire(".jpg").await.unwrap();
        let path = file.path().to_path_buf();
        assert!(path.exists());
        assert!(path.starts_with(root.path()));
        assert!(path.to_string_lossy().ends_with(".temp.jpg"));

        file.write_all(b"image bytes").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"image bytes");

        file.release().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn dropped_file_is_removed() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::new(root.path());

        let path = {
            let file = staging.acquire(".png").await.unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn file_is_removed_when_owner_panics() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::new(root.path());
        let (tx, rx) = std::sync::mpsc::channel();

        let result = tokio::spawn(async move {
            let file = staging.acquire(".png").await.unwrap();
            tx.send(file.path().to_path_buf()).unwrap();
            panic!("recognizer crashed");
        })
        .await;

        assert!(result.unwrap_err().is_panic());
        assert!(!rx.recv().unwrap().exists());
    }

    #[tokio::test]
    async fn concurrent_acquisitions_never_collide() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::new(root.path());

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let staging = staging.clone();
                tokio::spawn(async move { staging.acquire(".jpg").await.unwrap() })
            })
            .collect();

        let mut files = Vec::new();
        for handle in handles {
            files.push(handle.await.unwrap());
        }

        let names: HashSet<_> = files.iter().map(|f| f.path().to_path_buf()).collect();
        assert_eq!(names.len(), 100);

        for file in files {
            file.release().await.unwrap();
        }
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn initialize_creates_missing_root() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("staging").join("ocr");
        let staging = StagingArea::new(&nested);

        staging.initialize().await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(staging.root(), nested.as_path());
    }

    #[tokio::test]
    async fn acquire_fails_for_missing_root() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::new(root.path().join("does-not-exist"));
        assert!(matches!(staging.acquire(".jpg").await, Err(StagingError::Create { .. })));
    }
}
