use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: String,
    pub thumbnail: String,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub category: String,
    pub description: String,
    pub thumbnail: String,
    pub creator: Uuid,
}

/// Field changes applied by an edit. `thumbnail: None` keeps the current file.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub category: String,
    pub description: String,
    pub thumbnail: Option<String>,
}

/// Listing selector; every listing is newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Category(String),
    Creator(Uuid),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Category(category) => &post.category == category,
            PostFilter::Creator(creator) => &post.creator == creator,
        }
    }
}
