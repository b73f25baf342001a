//! In-process stores used by `--memory` mode and the test suites.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewPost, NewUser, Post, PostChanges, PostFilter, User};
use super::store::{PostStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            avatar: None,
            posts: 0,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.users.read().await.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email && u.id != id) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.name = name.to_string();
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.avatar = Some(avatar.to_string());
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn adjust_post_count(&self, id: Uuid, delta: i32) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.posts = (user.posts + delta).max(0);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

/// Posts kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let now = Utc::now();
        let record = Post {
            id: Uuid::new_v4(),
            title: post.title,
            category: post.category,
            description: post.description,
            thumbnail: post.thumbnail,
            creator: post.creator,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, DatabaseError> {
        let posts = self.posts.read().await;
        // Reverse first so the stable sort leaves equal timestamps newest-inserted first
        let mut matching: Vec<Post> = posts
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.title = changes.title;
            post.category = changes.category;
            post.description = changes.description;
            if let Some(thumbnail) = changes.thumbnail {
                post.thumbnail = thumbnail;
            }
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}
