//! Application bootstrap shared by the server binary and the CLI.

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// Open the store, register every module and bring the schema up to date.
pub async fn prepare(settings: &Settings) -> anyhow::Result<(ModuleRegistry, SqlitePool)> {
    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool.clone());

    let applied = bookstore_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to migrate database")?;
    tracing::info!(
        modules = registry.module_count(),
        applied,
        "modules registered and migrated"
    );

    Ok((registry, pool))
}

/// Run the HTTP API until a shutdown signal arrives.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore-api bootstrap starting"
    );

    let (registry, pool) = prepare(settings).await?;
    let ctx = InitCtx {
        settings,
        db: &pool,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookstore_http::start_server(&registry, settings).await;

    registry.stop_modules().await?;
    pool.close().await;

    tracing::info!("bookstore-api shut down");
    served
}

/// Apply pending migrations and exit. Returns the number applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool.clone());

    let applied = bookstore_db::run_migrations(&pool, &registry.collect_migrations()).await?;
    pool.close().await;

    Ok(applied)
}

/// Mount points the API would serve, without opening a listener.
pub async fn routes(settings: &Settings) -> anyhow::Result<Vec<String>> {
    let (registry, pool) = prepare(settings).await?;
    let paths = bookstore_http::mounted_paths(&registry);
    pool.close().await;

    Ok(paths)
}
