use crate::config::CONFIG;
use crate::db::sqlite::{SqlitePool, UserStorage};
use crate::error::StreamlineError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Process-wide database handle built from `CONFIG.basic.database_url`.
pub static DATABASE: LazyLock<Arc<Database>> =
    LazyLock::new(|| Arc::new(Database::new(CONFIG.basic.database_url.clone())));

/// Lazily connected, cached SQLite pool.
///
/// The first caller of [`Database::storage`] opens the pool and applies the schema
/// while holding the lock, so concurrent first requests share one connection attempt.
/// Later callers get a clone of the cached pool. [`Database::close`] tears it down;
/// the next call reconnects.
pub struct Database {
    url: String,
    pool: Mutex<Option<SqlitePool>>,
}

impl Database {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: Mutex::new(None),
        }
    }

    /// Returns the cached pool, connecting on first use.
    pub async fn pool(&self) -> Result<SqlitePool, StreamlineError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref()
            && !pool.is_closed()
        {
            return Ok(pool.clone());
        }

        let pool = Self::connect(&self.url).await?;
        info!(database_url = %self.url, "database pool initialized");
        *guard = Some(pool.clone());
        Ok(pool)
    }

    pub async fn storage(&self) -> Result<UserStorage, StreamlineError> {
        Ok(UserStorage::new(self.pool().await?))
    }

    pub async fn is_initialized(&self) -> bool {
        self.pool
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.is_closed())
    }

    /// Round-trip a trivial query through the pool.
    pub async fn ping(&self) -> Result<(), StreamlineError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the cached pool, if any.
    pub async fn close(&self) {
        let Some(pool) = self.pool.lock().await.take() else {
            return;
        };
        pool.close().await;
        info!(database_url = %self.url, "database pool closed");
    }

    async fn connect(url: &str) -> Result<SqlitePool, StreamlineError> {
        let connect_opts = SqliteConnectOptions::from_str(url)
            .map_err(StreamlineError::DatabaseUnavailable)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| {
                warn!(database_url = %url, error = %e, "database connect failed");
                StreamlineError::DatabaseUnavailable(e)
            })?;

        let storage = UserStorage::new(pool.clone());
        if let Err(e) = storage.init_schema().await {
            pool.close().await;
            return Err(e);
        }
        Ok(pool)
    }
}
