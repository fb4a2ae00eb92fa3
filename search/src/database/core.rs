use super::types::Database;
use crate::error::SearchError;
use crate::search::Dialect;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounded retry for opening the database and applying migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Database {
    /// Opens the database and applies pending migrations. URLs naming another
    /// engine fail with [`SearchError::UnsupportedDialect`].
    pub async fn new(database_url: &str) -> Result<Self, SearchError> {
        if let Some(dialect) = Dialect::from_url(database_url) {
            if !dialect.is_sqlite_compatible() {
                return Err(SearchError::UnsupportedDialect(dialect.name.to_string()));
            }
        }
        let pool = SqlitePool::connect(database_url).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self {
            pool,
            dialect: Dialect::SQLITE,
        })
    }

    /// Like [`Database::new`], retrying with a fixed backoff until the policy
    /// runs out of attempts. The last error is returned.
    pub async fn connect_with_retry(
        database_url: &str,
        policy: RetryPolicy,
    ) -> Result<Self, SearchError> {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt = attempt, "Opening photo database");

            match Self::new(database_url).await {
                Ok(db) => {
                    info!(attempt = attempt, "Photo database ready");
                    return Ok(db);
                }
                Err(e @ SearchError::UnsupportedDialect(_)) => return Err(e),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Photo database not ready, retrying"
                    );
                    tokio::time::sleep(policy.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// In-memory database with the schema applied. One connection, so every
    /// query sees the same data.
    pub async fn in_memory() -> Result<Self, SearchError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        sqlx::raw_sql(include_str!("../../migrations/001_photos.sql"))
            .execute(&pool)
            .await?;
        Ok(Self {
            pool,
            dialect: Dialect::SQLITE,
        })
    }

    /// Uses another SQLite compatible dialect, e.g. a different escape
    /// character or batch size.
    pub fn with_dialect(mut self, dialect: Dialect) -> Result<Self, SearchError> {
        if !dialect.is_sqlite_compatible() {
            return Err(SearchError::UnsupportedDialect(dialect.name.to_string()));
        }
        self.dialect = dialect;
        Ok(self)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn batch_size(&self) -> usize {
        self.dialect.batch_size()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
