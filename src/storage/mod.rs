//! Binary storage for uploaded images.
//!
//! Files are addressed by generated names only. A name is produced once per
//! upload and never reused, so a stored file belongs to exactly one record.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub mod local;

pub use local::LocalFileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File store I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// An uploaded file as received from the client, before it is stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under `name`. Fails if the write does not complete.
    async fn put(&self, name: &str, bytes: Bytes) -> Result<(), StorageError>;

    /// Remove `name`. Removing a file that is already gone succeeds.
    async fn remove(&self, name: &str) -> Result<(), StorageError>;
}

/// Build a collision-free name that keeps the client's base name and extension:
/// `photo.final.png` becomes `photo<uuid>.png`.
pub fn generate_file_name(original: &str) -> String {
    // Only the last path component is trusted
    let original = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let suffix = Uuid::new_v4().simple().to_string();
    let base = original.split('.').next().unwrap_or_default();

    match original.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}{}.{}", base, suffix, ext),
        _ => format!("{}{}", base, suffix),
    }
}

/// Generated names are single path components without traversal.
pub(crate) fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
