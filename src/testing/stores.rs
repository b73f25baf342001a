//! Memory stores whose writes can be made to fail on demand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{NewPost, NewUser, Post, PostChanges, PostFilter, User};
use crate::database::{DatabaseError, MemoryPostStore, MemoryUserStore, PostStore, UserStore};

fn offline(store: &str) -> DatabaseError {
    DatabaseError::ConnectionError(format!("{} store offline", store))
}

/// Post store that rejects inserts and updates while `fail_writes` is set
#[derive(Debug, Default)]
pub struct FaultyPostStore {
    inner: MemoryPostStore,
    fail_writes: AtomicBool,
}

impl FaultyPostStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(offline("post"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for FaultyPostStore {
    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError> {
        self.check()?;
        self.inner.insert(post).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        self.inner.find_by_id(id).await
    }

    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, DatabaseError> {
        self.inner.list(filter).await
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        self.check()?;
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.inner.delete(id).await
    }
}

/// How `set_avatar` misbehaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvatarFault {
    #[default]
    None,
    /// Reports no matching user, as if it was deleted concurrently
    Unapplied,
    Error,
}

/// User store whose avatar updates can be made to apply nothing or fail
#[derive(Debug, Default)]
pub struct FaultyUserStore {
    inner: MemoryUserStore,
    avatar_fault: Mutex<AvatarFault>,
}

impl FaultyUserStore {
    pub fn set_avatar_fault(&self, fault: AvatarFault) {
        *self.avatar_fault.lock().unwrap() = fault;
    }
}

#[async_trait]
impl UserStore for FaultyUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.inner.find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        self.inner.list().await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        self.inner.update_profile(id, name, email, password_hash).await
    }

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, DatabaseError> {
        let fault = *self.avatar_fault.lock().unwrap();
        match fault {
            AvatarFault::None => self.inner.set_avatar(id, avatar).await,
            AvatarFault::Unapplied => Ok(None),
            AvatarFault::Error => Err(offline("user")),
        }
    }

    async fn adjust_post_count(&self, id: Uuid, delta: i32) -> Result<Option<User>, DatabaseError> {
        self.inner.adjust_post_count(id, delta).await
    }
}
