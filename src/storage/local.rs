use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::{is_safe_name, FileStore, StorageError};

/// Filesystem-backed file store rooted at the upload directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::Io {
                name: root.display().to_string(),
                source,
            })?;
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, name: &str, bytes: Bytes) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| StorageError::Io {
                name: name.to_string(),
                source,
            })?;
        debug!("Stored {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::open(dir.path()).await.unwrap();

        store.put("a.png", Bytes::from_static(b"png")).await.unwrap();
        assert!(dir.path().join("a.png").is_file());
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"png");

        store.remove("a.png").await.unwrap();
        assert!(!dir.path().join("a.png").exists());
    }

    #[tokio::test]
    async fn removing_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::open(dir.path()).await.unwrap();
        assert!(store.remove("never-written.png").await.is_ok());
    }

    #[tokio::test]
    async fn creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        LocalFileStore::open(&root).await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::open(dir.path()).await.unwrap();
        let result = store.put("../escape.png", Bytes::from_static(b"x")).await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        let store = LocalFileStore::open(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();

        let result = store.put("a.png", Bytes::from_static(b"x")).await;
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }
}
