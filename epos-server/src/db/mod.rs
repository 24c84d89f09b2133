//! Database Module
//!
//! Handles SQLite connection pool, migrations and start-up seeding

pub mod repository;
pub mod seed;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::utils::AppError;

/// Owns the SQLite connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl DbService {
    /// Open (or create) the database file in WAL mode and migrate it
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = parse_url(&format!("sqlite:{db_path}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // applies to every pooled connection, not just the first
            .busy_timeout(BUSY_TIMEOUT)
            .optimize_on_close(true, None);

        let db = Self::open(SqlitePoolOptions::new().max_connections(5), options).await?;
        tracing::info!(path = %db_path, busy_timeout_ms = BUSY_TIMEOUT.as_millis() as u64, "SQLite database opened (WAL)");
        Ok(db)
    }

    /// In-memory database for tests
    ///
    /// Each `:memory:` connection is a separate database, so the pool keeps
    /// exactly one connection alive.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        Self::open(pool_options, parse_url("sqlite::memory:")?).await
    }

    async fn open(
        pool_options: SqlitePoolOptions,
        options: SqliteConnectOptions,
    ) -> Result<Self, AppError> {
        let pool = pool_options
            .connect_with(options.foreign_keys(true))
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::debug!("Database migrations applied");

        Ok(Self { pool })
    }
}

fn parse_url(url: &str) -> Result<SqliteConnectOptions, AppError> {
    SqliteConnectOptions::from_str(url)
        .map_err(|e| AppError::database(format!("Invalid database path: {e}")))
}
