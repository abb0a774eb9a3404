//! SQLite-backed recommendation store.
//!
//! - `records` — single-record lookup and the `RecordStore` implementation

mod records;

use agriwaste_core::{config::DatabaseConfig, error::AgriError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Recommendation store backed by a SQLite connection pool.
///
/// Cloning shares the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect, verify the connection, and run migrations.
    ///
    /// Every failure here is a startup failure: the service must not accept
    /// requests without a working store.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AgriError> {
        if !config.url.starts_with("sqlite:") {
            return Err(AgriError::Startup(format!(
                "unsupported database url '{}': expected a sqlite: url",
                config.url
            )));
        }
        let in_memory = config.url.contains(":memory:");

        let mut opts = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AgriError::Startup(format!("invalid database url: {e}")))?
            .create_if_missing(true);

        if !in_memory {
            if let Some(parent) = opts.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AgriError::Startup(format!("failed to create data dir: {e}"))
                    })?;
                }
            }
            opts = opts.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_opts = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout());

        // Each connection to `:memory:` opens a separate database, and closing
        // the last one drops it.
        if in_memory {
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_opts
            .connect_with(opts)
            .await
            .map_err(|e| AgriError::Startup(format!("failed to connect to sqlite: {e}")))?;

        let store = Self { pool };

        tokio::time::timeout(config.connect_timeout(), store.ping_pool())
            .await
            .map_err(|_| {
                AgriError::Startup(format!(
                    "store ping timed out after {}s",
                    config.connect_timeout_secs
                ))
            })?
            .map_err(|e| AgriError::Startup(format!("store ping failed: {e}")))?;

        Self::run_migrations(&store.pool)
            .await
            .map_err(|e| AgriError::Startup(e.to_string()))?;

        info!("Recommendation store connected at {}", config.url);

        Ok(store)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ping_pool(&self) -> Result<(), AgriError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AgriError::StoreUnavailable(format!("ping failed: {e}")))?;
        Ok(())
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), AgriError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| {
            AgriError::StoreUnavailable(format!("failed to create migrations table: {e}"))
        })?;

        let migrations: &[(&str, &str)] = &[(
            "001_recommendations",
            include_str!("../../migrations/001_recommendations.sql"),
        )];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        AgriError::StoreUnavailable(format!(
                            "failed to check migration {name}: {e}"
                        ))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| AgriError::StoreUnavailable(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    AgriError::StoreUnavailable(format!("failed to record migration {name}: {e}"))
                })?;

            info!("applied migration {name}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
