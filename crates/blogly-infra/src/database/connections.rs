#[cfg(feature = "postgres")]
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Log every SQL statement.
    pub echo: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            echo: false,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(300)
    }
}

/// Connection pool shared by the PostgreSQL repositories.
///
/// # Example
/// ```ignore
/// let pool = DbPool::connect(&config).await?;
/// let users = PostgresUserRepository::new(pool.conn.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DbPool {
    pub conn: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DbPool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Connecting to database...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(config.echo)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            echo = config.echo,
            "Database connected"
        );

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Check the pool can still reach the database.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}
