use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewPost, NewUser, Post, PostChanges, PostFilter, User};
use super::store::{PostStore, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, posts, created_at, updated_at";
const POST_COLUMNS: &str =
    "id, title, category, description, thumbnail, creator, created_at, updated_at";

/// Newest first; `seq` orders posts created within the same timestamp
const POST_ORDER: &str = "ORDER BY created_at DESC, seq DESC";

fn list_posts_sql(filter: &PostFilter) -> String {
    let condition = match filter {
        PostFilter::All => "",
        PostFilter::Category(_) => " WHERE category = $1",
        PostFilter::Creator(_) => " WHERE creator = $1",
    };
    format!("SELECT {} FROM posts{} {}", POST_COLUMNS, condition, POST_ORDER)
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, posts)
             VALUES ($1, $2, $3, $4, 0)
             RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users
             SET name = $2, email = $3, password_hash = $4, updated_at = now()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET avatar = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(avatar)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn adjust_post_count(&self, id: Uuid, delta: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET posts = GREATEST(posts + $2, 0), updated_at = now()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(delta)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let sql = format!(
            "INSERT INTO posts (id, title, category, description, thumbnail, creator)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(&post.title)
            .bind(&post.category)
            .bind(&post.description)
            .bind(&post.thumbnail)
            .bind(post.creator)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, DatabaseError> {
        let sql = list_posts_sql(&filter);
        let query = sqlx::query_as::<_, Post>(&sql);
        let posts = match filter {
            PostFilter::All => query.fetch_all(&self.pool).await?,
            PostFilter::Category(category) => query.bind(category).fetch_all(&self.pool).await?,
            PostFilter::Creator(creator) => query.bind(creator).fetch_all(&self.pool).await?,
        };
        Ok(posts)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        // COALESCE keeps the current thumbnail when no replacement is given
        let sql = format!(
            "UPDATE posts
             SET title = $2, category = $3, description = $4,
                 thumbnail = COALESCE($5, thumbnail), updated_at = now()
             WHERE id = $1
             RETURNING {}",
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.category)
            .bind(&changes.description)
            .bind(&changes.thumbnail)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
