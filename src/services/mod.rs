pub mod content_service;
pub mod identity_service;

pub use content_service::{ContentService, PostFields};
pub use identity_service::{IdentityService, LoginSession, ProfileUpdate, Registration};

use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::storage::{FileStore, StorageError};

/// Failures reported by the identity and content services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Remove a file no record points at any more. Failures leave a stale file
/// behind and are only logged.
async fn remove_stale_file(files: &dyn FileStore, name: &str) {
    if let Err(e) = files.remove(name).await {
        tracing::warn!("Failed to remove stale file {}: {}", name, e);
    }
}
