//! SQLite data store plumbing: pool factory, module migration runner, and the
//! error taxonomy repositories report to the HTTP layer.

use std::str::FromStr;

use anyhow::Context;
use bookstore_kernel::{settings::DatabaseSettings, Migration};
use sqlx::{
    error::ErrorKind,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use thiserror::Error;

const MIGRATIONS_TABLE: &str = "_migrations";

/// Failure classes a repository can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional write matched no row: the record changed or vanished
    /// between read and write.
    #[error("record was modified or removed by another request")]
    Concurrency,

    #[error("foreign key constraint failed")]
    ForeignKey,

    #[error("unique constraint failed")]
    Unique,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some(db_err.kind()),
            _ => None,
        };

        match kind {
            Some(ErrorKind::ForeignKeyViolation) => StoreError::ForeignKey,
            Some(ErrorKind::UniqueViolation) => StoreError::Unique,
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Open a connection pool for the configured database URL.
///
/// In-memory databases live and die with a single connection, so they are
/// pinned to one connection that is never recycled.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = is_in_memory(&settings.url);
    let mut pool_options = SqlitePoolOptions::new();
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(settings.max_connections);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(
        target: "bookstore-db",
        in_memory,
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Apply module migrations that have not been recorded yet.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns the number of migrations applied by this call.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (module, id)
        )
        "#
    ))
    .execute(pool)
    .await
    .context("failed to create migrations table")?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let already_applied: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT 1 FROM {MIGRATIONS_TABLE} WHERE module = ?1 AND id = ?2"
        ))
        .bind(module)
        .bind(migration.id)
        .fetch_optional(pool)
        .await
        .context("failed to read migration history")?;

        if already_applied.is_some() {
            tracing::debug!(module = %module, migration = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        sqlx::query(&format!(
            "INSERT INTO {MIGRATIONS_TABLE} (module, id) VALUES (?1, ?2)"
        ))
        .bind(module)
        .bind(migration.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
