use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewPost, NewUser, Post, PostChanges, PostFilter, User};

/// Credential store. Emails are stored already normalized to lowercase.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with a post count of zero.
    /// Fails with `UniqueViolation` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    /// Replace name, email and password hash. `None` if the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, DatabaseError>;

    /// Relative post-count update, floored at zero.
    async fn adjust_post_count(&self, id: Uuid, delta: i32) -> Result<Option<User>, DatabaseError>;
}

/// Content store.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;

    /// Matching posts, most recently created first.
    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, DatabaseError>;

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError>;

    /// `false` if there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
