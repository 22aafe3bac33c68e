use crate::error::DbError;
use crate::repository::DbRepository;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Pool tuning knobs, normally sourced from the application configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before giving up.
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Establishes a connection pool with default tuning.
pub async fn connect(location: &str) -> Result<SqlitePool, DbError> {
    connect_with_config(location, &DatabaseConfig::default()).await
}

/// Establishes a connection pool against the given storage location.
///
/// Accepts a plain file path (created if missing), the special `:memory:`
/// location for an ephemeral database, or a full `sqlite:` URL. Foreign-key
/// enforcement is switched on for every connection; in-memory databases are
/// pinned to a single long-lived connection regardless of the configured
/// pool size, since each SQLite connection would otherwise see its own
/// private memory database.
pub async fn connect_with_config(
    location: &str,
    config: &DatabaseConfig,
) -> Result<SqlitePool, DbError> {
    let in_memory = location == ":memory:" || location == "sqlite::memory:";

    let options = if in_memory {
        SqliteConnectOptions::new().in_memory(true)
    } else {
        let parsed = if location.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(location)
                .map_err(|_| DbError::ConnectionConfig(location.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(location)
        };
        parsed.create_if_missing(true)
    };
    let options = options.foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

/// Applies all pending migrations, in ascending order, each inside its own
/// transaction. Already-applied migrations are tracked in sqlx's metadata
/// table and skipped, so running this against an up-to-date database is a
/// no-op.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Returns how many migrations have been recorded as applied.
pub async fn applied_migration_count(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// The live, ready-to-query database handle.
///
/// Constructed exactly once at process start via [`Database::initialize`]
/// and then passed (or cheaply cloned) into every component that needs
/// storage access. A failed initialization leaves nothing behind, so the
/// call can simply be retried.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the storage at `location` with default pool
    /// tuning and brings its schema up to date before returning.
    pub async fn initialize(location: &str) -> Result<Self, DbError> {
        Self::initialize_with_config(location, &DatabaseConfig::default()).await
    }

    /// Opens (or creates) the storage at `location` and brings its schema
    /// up to date before returning. No query can run through this handle
    /// against an unmigrated database.
    pub async fn initialize_with_config(
        location: &str,
        config: &DatabaseConfig,
    ) -> Result<Self, DbError> {
        let pool = connect_with_config(location, config).await?;
        run_migrations(&pool).await?;
        let applied = applied_migration_count(&pool).await?;
        tracing::info!(location, applied, "database initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The high-level data access interface bound to this handle.
    pub fn repository(&self) -> DbRepository {
        DbRepository::new(self.pool.clone())
    }
}
