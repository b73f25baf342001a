use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use super::{is_blank, remove_stale_file, ServiceError, ServiceResult};
use crate::database::models::{NewPost, Post, PostChanges, PostFilter};
use crate::database::{PostStore, UserStore};
use crate::storage::{generate_file_name, FileStore, UploadedFile};

const MIN_DESCRIPTION_LEN: usize = 12;

/// Text fields of a post as submitted by its author.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: String,
    pub category: String,
    pub description: String,
}

/// Post lifecycle over the content, credential and file stores.
///
/// File and record stores are separate failure domains with no shared
/// transaction. Operations are ordered so that a failure part-way leaves at
/// worst an unreferenced file, never a record pointing at a missing file.
/// The per-user post counter is adjusted right after each create/delete and
/// can drift if that adjustment fails; there is no reconciliation job.
pub struct ContentService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    files: Arc<dyn FileStore>,
    max_thumbnail_bytes: usize,
}

impl ContentService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
        max_thumbnail_bytes: usize,
    ) -> Self {
        Self {
            posts,
            users,
            files,
            max_thumbnail_bytes,
        }
    }

    pub async fn create_post(
        &self,
        creator: Uuid,
        fields: PostFields,
        thumbnail: Option<UploadedFile>,
    ) -> ServiceResult<Post> {
        let thumbnail = match thumbnail {
            Some(file)
                if !is_blank(&fields.title)
                    && !is_blank(&fields.category)
                    && !is_blank(&fields.description) =>
            {
                file
            }
            _ => {
                return Err(ServiceError::validation(
                    "Fill in all fields and choose thumbnail.",
                ))
            }
        };
        self.check_thumbnail_size(&thumbnail)?;

        // The file must be in place before any record refers to it
        let file_name = generate_file_name(&thumbnail.file_name);
        self.files.put(&file_name, thumbnail.bytes).await?;

        let post = match self
            .posts
            .insert(NewPost {
                title: fields.title,
                category: fields.category,
                description: fields.description,
                thumbnail: file_name.clone(),
                creator,
            })
            .await
        {
            Ok(post) => post,
            Err(e) => {
                remove_stale_file(self.files.as_ref(), &file_name).await;
                return Err(e.into());
            }
        };

        self.adjust_post_count(creator, 1).await?;

        info!("User {} created post {}", creator, post.id);
        Ok(post)
    }

    pub async fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list(PostFilter::All).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> ServiceResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post not found."))
    }

    pub async fn list_posts_by_category(&self, category: &str) -> ServiceResult<Vec<Post>> {
        Ok(self
            .posts
            .list(PostFilter::Category(category.to_string()))
            .await?)
    }

    pub async fn list_posts_by_creator(&self, creator: Uuid) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list(PostFilter::Creator(creator)).await?)
    }

    /// Update a post owned by `requester`. Without a new thumbnail only the
    /// text fields change. With one, the new file is validated and stored, the
    /// record is pointed at it, and only then is the old file removed.
    pub async fn edit_post(
        &self,
        post_id: Uuid,
        requester: Uuid,
        fields: PostFields,
        thumbnail: Option<UploadedFile>,
    ) -> ServiceResult<Post> {
        if is_blank(&fields.title)
            || is_blank(&fields.category)
            || fields.description.chars().count() < MIN_DESCRIPTION_LEN
        {
            return Err(ServiceError::validation("Fill in all fields."));
        }

        let existing = self.get_post(post_id).await?;
        if existing.creator != requester {
            return Err(ServiceError::forbidden("Couldn't edit post."));
        }

        let Some(thumbnail) = thumbnail else {
            let updated = self
                .posts
                .update(
                    post_id,
                    PostChanges {
                        title: fields.title,
                        category: fields.category,
                        description: fields.description,
                        thumbnail: None,
                    },
                )
                .await?
                .ok_or_else(|| ServiceError::not_found("Post not found."))?;

            info!("User {} edited post {}", requester, post_id);
            return Ok(updated);
        };

        self.check_thumbnail_size(&thumbnail)?;

        let file_name = generate_file_name(&thumbnail.file_name);
        self.files.put(&file_name, thumbnail.bytes).await?;

        let updated = match self
            .posts
            .update(
                post_id,
                PostChanges {
                    title: fields.title,
                    category: fields.category,
                    description: fields.description,
                    thumbnail: Some(file_name.clone()),
                },
            )
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                remove_stale_file(self.files.as_ref(), &file_name).await;
                return Err(ServiceError::not_found("Post not found."));
            }
            Err(e) => {
                remove_stale_file(self.files.as_ref(), &file_name).await;
                return Err(e.into());
            }
        };

        remove_stale_file(self.files.as_ref(), &existing.thumbnail).await;

        info!(
            "User {} edited post {} (thumbnail {} -> {})",
            requester, post_id, existing.thumbnail, file_name
        );
        Ok(updated)
    }

    /// Delete a post owned by `requester`. The thumbnail goes first; if it
    /// cannot be removed the record is kept.
    pub async fn delete_post(&self, post_id: Uuid, requester: Uuid) -> ServiceResult<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post does not exist."))?;

        if post.creator != requester {
            return Err(ServiceError::forbidden("Post could not be deleted."));
        }

        self.files.remove(&post.thumbnail).await?;

        if !self.posts.delete(post_id).await? {
            return Err(ServiceError::not_found("Post does not exist."));
        }

        self.adjust_post_count(post.creator, -1).await?;

        info!("User {} deleted post {}", requester, post_id);
        Ok(())
    }

    fn check_thumbnail_size(&self, thumbnail: &UploadedFile) -> ServiceResult<()> {
        if thumbnail.size() >= self.max_thumbnail_bytes {
            return Err(ServiceError::validation(
                "Thumbnail too big. File should be less than 2mb.",
            ));
        }
        Ok(())
    }

    async fn adjust_post_count(&self, user_id: Uuid, delta: i32) -> ServiceResult<()> {
        match self.users.adjust_post_count(user_id, delta).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                error!("Post count for missing user {} not adjusted by {}", user_id, delta);
                Err(ServiceError::not_found("User not found."))
            }
            Err(e) => {
                error!("Post count for user {} not adjusted by {}: {}", user_id, delta, e);
                Err(e.into())
            }
        }
    }
}
