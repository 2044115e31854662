//! Bookstore application library
//!
//! Application modules plus the bootstrap shared by the server binary and the CLI.

pub mod modules;

use anyhow::Context;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};

/// Run the full server lifecycle until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    if settings.database.auto_migrate {
        let applied = bookstore_db::apply_migrations(&pool, &registry.collect_migrations())
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, "migrations up to date");
    }

    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(&registry, &settings).await;

    let stopped = registry.stop_all().await;
    pool.close().await;

    served?;
    stopped
}

/// Apply pending migrations for every registered module and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool);

    let applied = bookstore_db::apply_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    pool.close().await;

    Ok(applied)
}
