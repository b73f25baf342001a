use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use crate::auth::TokenKeys;
use crate::database::UserStore;
use crate::services::{ContentService, IdentityService, Registration};
use crate::storage::LocalFileStore;

mod stores;

pub use stores::{AvatarFault, FaultyPostStore, FaultyUserStore};

pub const TEST_SECRET: &str = "test-secret";

/// Services wired to in-memory stores and a throwaway upload directory.
/// Store writes succeed unless a fault is switched on.
pub struct TestContext {
    pub identity: IdentityService,
    pub content: ContentService,
    pub users: Arc<FaultyUserStore>,
    pub posts: Arc<FaultyPostStore>,
    pub tokens: TokenKeys,
    upload_dir: PathBuf,
    _temp: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let upload_dir = temp.path().join("uploads");
        let files = Arc::new(
            LocalFileStore::open(&upload_dir)
                .await
                .expect("failed to open file store"),
        );

        let users = Arc::new(FaultyUserStore::default());
        let posts = Arc::new(FaultyPostStore::default());
        let tokens = TokenKeys::from_secret(TEST_SECRET).expect("valid secret");

        let identity = IdentityService::new(users.clone(), files.clone(), tokens.clone(), 500_000);
        let content = ContentService::new(posts.clone(), users.clone(), files, 2_000_000);

        Self {
            identity,
            content,
            users,
            posts,
            tokens,
            upload_dir,
            _temp: temp,
        }
    }

    /// Register a user named "Alice" with password "secret1" and return its id
    pub async fn register_user(&self, email: &str) -> Uuid {
        self.identity
            .register(Registration {
                name: "Alice".to_string(),
                email: email.to_string(),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
            })
            .await
            .expect("registration failed");

        self.users
            .find_by_email(&email.to_lowercase())
            .await
            .expect("store error")
            .expect("registered user missing")
            .id
    }

    pub async fn post_count(&self, user_id: Uuid) -> i32 {
        self.identity.get_user(user_id).await.expect("user missing").posts
    }

    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.upload_dir.join(name)
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.upload_path(name).is_file()
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Remove the upload directory so every write fails
    pub fn break_upload_dir(&self) {
        std::fs::remove_dir_all(&self.upload_dir).expect("failed to remove upload dir");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_starts_empty() {
        let ctx = TestContext::new().await;
        assert_eq!(ctx.stored_file_count(), 0);
        assert!(ctx.identity.list_authors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registered_users_are_distinct() {
        let ctx = TestContext::new().await;
        let a = ctx.register_user("a@x.com").await;
        let b = ctx.register_user("b@x.com").await;
        assert_ne!(a, b);
        assert_eq!(ctx.post_count(a).await, 0);
    }
}
