use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::{
    DatabaseManager, MemoryPostStore, MemoryUserStore, PgPostStore, PgUserStore, PostStore, UserStore,
};
use crate::services::{ContentService, IdentityService};
use crate::storage::{FileStore, LocalFileStore};

/// Where user and post records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

/// Shared handler state. Everything request-specific (the caller's identity)
/// is passed to the services explicitly by the handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub content: Arc<ContentService>,
    pub tokens: TokenKeys,
    pub database: Option<DatabaseManager>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        tokens: TokenKeys,
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        files: Arc<dyn FileStore>,
        database: Option<DatabaseManager>,
    ) -> Self {
        let identity = IdentityService::new(
            users.clone(),
            files.clone(),
            tokens.clone(),
            config.uploads.max_avatar_bytes,
        );
        let content = ContentService::new(posts, users, files, config.uploads.max_thumbnail_bytes);

        Self {
            identity: Arc::new(identity),
            content: Arc::new(content),
            tokens,
            database,
            upload_dir: config.uploads.dir.clone(),
        }
    }

    /// Open the stores named by `backend` and wire the services
    pub async fn from_config(config: &AppConfig, backend: Backend) -> anyhow::Result<Self> {
        let tokens = TokenKeys::from_secret(&config.security.jwt_secret)?;
        let files = Arc::new(
            LocalFileStore::open(&config.uploads.dir)
                .await
                .context("failed to open upload directory")?,
        );
        info!("Storing uploads in {}", config.uploads.dir.display());

        let state = match backend {
            Backend::Postgres => {
                let database = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to database")?;
                database
                    .bootstrap_schema()
                    .await
                    .context("failed to prepare database schema")?;

                let pool = database.pool().clone();
                Self::new(
                    config,
                    tokens,
                    Arc::new(PgUserStore::new(pool.clone())),
                    Arc::new(PgPostStore::new(pool)),
                    files,
                    Some(database),
                )
            }
            Backend::Memory => {
                info!("Using in-memory stores; records are lost on shutdown");
                Self::new(
                    config,
                    tokens,
                    Arc::new(MemoryUserStore::new()),
                    Arc::new(MemoryPostStore::new()),
                    files,
                    None,
                )
            }
        };

        Ok(state)
    }
}
