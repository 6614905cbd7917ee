//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context as _;

use blogly_core::ports::{PostRepository, TagRepository, UserRepository};
use blogly_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use blogly_infra::{DbPool, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};

use crate::config::AppConfig;
use crate::views::Views;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub views: Arc<Views>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DbPool>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let views = Arc::new(Views::new().context("compiling page templates")?);

        let state = Self::with_storage(config, views).await?;
        tracing::info!("Application state initialized");
        Ok(state)
    }

    #[cfg(feature = "postgres")]
    async fn with_storage(config: &AppConfig, views: Arc<Views>) -> anyhow::Result<Self> {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory(InMemoryStore::new(), views));
        };

        let pool = DbPool::connect(db_config)
            .await
            .context("connecting to the database")?;

        if config.auto_migrate {
            Migrator::up(&*pool.conn, None)
                .await
                .context("applying database migrations")?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(pool.conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(pool.conn.clone())),
            views,
            db: Some(Arc::new(pool)),
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn with_storage(config: &AppConfig, views: Arc<Views>) -> anyhow::Result<Self> {
        if config.database.is_some() {
            tracing::warn!("Built without the postgres feature - DATABASE_URL is ignored");
        }
        tracing::info!("Running with in-memory repositories");
        Ok(Self::in_memory(InMemoryStore::new(), views))
    }

    /// State backed by an in-memory store.
    pub fn in_memory(store: InMemoryStore, views: Arc<Views>) -> Self {
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            tags: Arc::new(store.tags()),
            views,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Storage status reported by the health check.
    #[cfg(feature = "postgres")]
    pub async fn storage_status(&self) -> &'static str {
        match &self.db {
            Some(pool) => match pool.ping().await {
                Ok(()) => "connected",
                Err(e) => {
                    tracing::warn!(error = %e, "Database ping failed");
                    "unreachable"
                }
            },
            None => "in-memory",
        }
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn storage_status(&self) -> &'static str {
        "in-memory"
    }
}
