use async_trait::async_trait;
use axum::Router;
use sqlx::SqlitePool;

use crate::settings::Settings;

/// Shared resources handed to modules during their lifecycle hooks
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
    /// Pool with every module's migrations already applied
    pub db: &'a SqlitePool,
}

/// Forward-only SQL migration contributed by a module
///
/// `id` orders migrations within a module and is recorded once applied.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A resource exposed by the API, mounted at `/api/{name}`
#[async_trait]
pub trait Module: Sync + Send {
    /// Mount segment, e.g. `Authors`. Must be unique within a registry.
    fn name(&self) -> &'static str;

    /// Runs after migrations, before the listener is bound
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the mount point and any
    /// `components.schemas` the paths reference
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Called once the HTTP surface is about to accept traffic
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, after the listener has drained
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
