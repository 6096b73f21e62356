//! Database Module
//!
//! Handles the SQLite connection pool, migrations and store-call timeouts

pub mod repository;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::core::Config;
use crate::utils::AppError;
use repository::{RepoError, RepoResult};

/// Database service: owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and apply migrations
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.database_path))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(5000))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_millis(config.query_timeout_ms))
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            path = %config.database_path,
            max_connections = config.db_max_connections,
            "Database connection established (SQLite WAL, busy_timeout=5000ms)"
        );

        migrate(&pool).await?;
        Ok(Self { pool })
    }
}

/// Apply embedded migrations
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Run a store call under a deadline.
///
/// An elapsed deadline surfaces as [`RepoError::Timeout`], which clients
/// see as a retryable failure. Dropping the future rolls back any open
/// transaction it holds.
pub async fn timed<T, F>(limit: Duration, fut: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Store call timed out");
            Err(RepoError::Timeout)
        }
    }
}

/// In-memory database with the real schema, for tests.
///
/// A single long-lived connection: every new `sqlite::memory:` connection
/// would otherwise open an empty database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}

/// File database in WAL mode with a multi-connection pool, for tests that
/// need real concurrent writers. Keep `dir` alive for the pool's lifetime.
#[cfg(test)]
pub(crate) async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
    let config = Config {
        database_path: dir.path().join("ebed.db").to_string_lossy().into_owned(),
        db_max_connections: 8,
        ..Config::default()
    };
    DbService::new(&config).await.unwrap().pool
}
